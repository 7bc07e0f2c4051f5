//! Definitions of Solidity functions called by the challenge scripts

#![allow(missing_docs, clippy::missing_docs_in_private_items)]

use alloy::sol;

sol! {
    /// The decentralized exchange
    interface IDEX {
        function totalLiquidity() external view returns (uint256);
        function init(uint256 tokens) external payable returns (uint256);
    }

    /// The ERC20 token traded on the DEX
    interface IBalloons {
        function approve(address spender, uint256 value) external returns (bool);
    }

    /// Contracts with a single transferable owner
    interface IOwnable {
        function transferOwnership(address newOwner) external;
    }
}
