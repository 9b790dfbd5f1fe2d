//! Solidity ABI interfaces for the outgoing calls: EntryPoint deposit/stake management and
//! ERC-20 `transferFrom`.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    interface IEntryPoint {
        function depositTo(address account) external payable;
        function balanceOf(address account) external view returns (uint256);
        function withdrawTo(address withdrawAddress, uint256 withdrawAmount) external;
        function addStake(uint32 unstakeDelaySec) external payable;
        function unlockStake() external;
        function withdrawStake(address withdrawAddress) external;
    }

    interface IERC20 {
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}
