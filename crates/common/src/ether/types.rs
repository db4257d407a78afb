use alloy::sol;

sol! {
    /// The subset of the ERC20 interface needed to read balances.
    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }

    /// The ERC20 `Transfer` event. ERC721 emits the same signature with an indexed
    /// `tokenId` (four topics), which fails to decode against this definition.
    #[derive(Debug, PartialEq, Eq)]
    event Transfer(address indexed from, address indexed to, uint256 value);
}
