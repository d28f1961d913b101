//! EVM token bridge contract ABI definitions
//!
//! Uses alloy's sol! macro to generate call and return types. Calldata is
//! built with `SolCall::abi_encode` and read-only results are decoded with
//! `SolCall::abi_decode_returns`.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// Token bridge contract interface
    contract TokenBridge {
        // ========================================================================
        // Attestation
        // ========================================================================

        /// Publish a token's metadata so other chains can create a wrapped asset
        function attestToken(address tokenAddress, uint32 nonce) external payable returns (uint64 sequence);

        // ========================================================================
        // Transfers
        // ========================================================================

        /// Lock a native ERC20 or burn a wrapped one
        function transferTokens(address token, uint256 amount, uint16 recipientChain, bytes32 recipient, uint256 arbiterFee, uint32 nonce) external payable returns (uint64 sequence);

        /// Transfer with an arbitrary payload for the recipient contract
        function transferTokensWithPayload(address token, uint256 amount, uint16 recipientChain, bytes32 recipient, uint32 nonce, bytes payload) external payable returns (uint64 sequence);

        /// Wrap msg.value into WETH and lock it
        function wrapAndTransferETH(uint16 recipientChain, bytes32 recipient, uint256 arbiterFee, uint32 nonce) external payable returns (uint64 sequence);

        /// Wrap msg.value into WETH and lock it, with a payload
        function wrapAndTransferETHWithPayload(uint16 recipientChain, bytes32 recipient, uint32 nonce, bytes payload) external payable returns (uint64 sequence);

        // ========================================================================
        // Redemption
        // ========================================================================

        function completeTransfer(bytes encodedVm) external;

        function completeTransferWithPayload(bytes encodedVm) external returns (bytes memory);

        /// Redeem a WETH transfer and pay out native ETH
        function completeTransferAndUnwrapETH(bytes encodedVm) external;

        function completeTransferAndUnwrapETHWithPayload(bytes encodedVm) external returns (bytes memory);

        // ========================================================================
        // View Functions
        // ========================================================================

        /// Whether a transfer with this signed digest was redeemed
        function isTransferCompleted(bytes32 hash) external view returns (bool);

        /// Wrapped asset for a foreign token, zero address if none
        function wrappedAsset(uint16 tokenChainId, bytes32 tokenAddress) external view returns (address);

        function isWrappedAsset(address token) external view returns (bool);

        /// Wrapped native asset of this chain
        function WETH() external view returns (address);

        /// Protocol chain id of this deployment
        function chainId() external view returns (uint16);
    }

    /// Wrapped token deployed by the bridge
    contract BridgeToken {
        function chainId() external view returns (uint16);
        function nativeContract() external view returns (bytes32);
    }

    /// Standard ERC20 interface
    contract ERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}
