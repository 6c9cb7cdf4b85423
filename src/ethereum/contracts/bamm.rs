//! BAMM pool and factory contract bindings.

use alloy::sol;

// BAMM pool interface
sol! {
    #[sol(rpc, all_derives)]
    interface IBamm {
        /// Unified position change submitted through `executeActions`.
        struct Action {
            int256 token0Amount;
            int256 token1Amount;
            int256 rent;
            address to;
            uint256 token0AmountMin;
            uint256 token1AmountMin;
            bool closePosition;
            bool approveMax;
            uint8 v;
            bytes32 r;
            bytes32 s;
            uint256 deadline;
        }

        /// Per-user vault state.
        struct Vault {
            int256 token0;
            int256 token1;
            int256 rented;
        }

        function token0() external view returns (address);
        function token1() external view returns (address);
        function pair() external view returns (address);
        function iBammErc20() external view returns (address);
        function rentedMultiplier() external view returns (uint256);
        function isUser(address user) external view returns (bool);
        function getUserVault(address user) external view returns (Vault memory);

        function mint(address to, uint256 lpIn) external returns (uint256 bammOut);
        function redeem(address to, uint256 bammIn) external returns (uint256 lpOut);
        function executeActions(Action memory action) external;
    }
}

// BAMM factory interface
sol! {
    #[sol(rpc)]
    interface IBammFactory {
        function bammsArray() external view returns (address[] memory);
    }
}
