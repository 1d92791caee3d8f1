//! Solidity bindings for the Solidly-style AMM contracts read during quoting.

use alloy::sol;

sol! {
    /// Minimal ERC-20 metadata interface.
    #[sol(rpc)]
    interface IERC20 {
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
    }

    /// Aerodrome / Velodrome v2 pool.
    #[sol(rpc)]
    interface IPool {
        function getReserves() external view returns (uint256 reserve0, uint256 reserve1, uint256 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    /// Pool factory. `getFee` returns basis points.
    #[sol(rpc)]
    interface IPoolFactory {
        function getFee(address pool, bool stable) external view returns (uint256);
        function getPool(address tokenA, address tokenB, bool stable) external view returns (address);
    }

    /// Router pricing entry point.
    #[sol(rpc)]
    interface IRouter {
        struct Route {
            address from;
            address to;
            bool stable;
            address factory;
        }

        function getAmountsOut(uint256 amountIn, Route[] memory routes) external view returns (uint256[] memory amounts);
    }
}
