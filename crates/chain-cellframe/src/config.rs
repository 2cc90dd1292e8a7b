use wallet_numeric::U256;

/// The default Cellframe network name.
pub const DEFAULT_NET: &str = "Backbone";

/// The network fee collector address — a fixed protocol constant, not a
/// per-deployment configuration value.
pub const NETWORK_FEE_COLLECTOR_ADDRESS: &str = "Rj7J7MiX2bWy8sNyX38bB86KTFUnSn7sdKDsTFa2RJyQTDWFaebrj6BucT7Wa5CSq77zwRAwevbiKy1sv1RBGTonM83D3xPDwoyGasZ7";

/// Default network fee in datoshi (0.002 CELL).
pub const DEFAULT_NETWORK_FEE: u64 = 2_000_000_000_000_000;

/// Default validator fee in datoshi (0.0001 CELL).
pub const DEFAULT_VALIDATOR_FEE: u64 = 100_000_000_000_000;

/// Per-network RPC endpoint and protocol constants, overridable via
/// environment (`dotenvy`) for non-default deployments.
#[derive(Debug, Clone)]
pub struct CellframeNetworkConfig {
    pub net_name: String,
    pub net_id: u64,
    pub rpc_url: String,
    pub fee_collector_address: String,
    pub network_fee: U256,
    pub validator_fee: U256,
}

impl CellframeNetworkConfig {
    /// The `"Backbone"` mainnet configuration with its default fees and
    /// fee-collector address, reading `CELLFRAME_RPC_URL` if set.
    pub fn backbone() -> Self {
        dotenvy::dotenv().ok();
        let rpc_url = std::env::var("CELLFRAME_RPC_URL")
            .unwrap_or_else(|_| "http://localhost:8079".to_string());

        CellframeNetworkConfig {
            net_name: DEFAULT_NET.to_string(),
            net_id: 0x0404202200000000,
            rpc_url,
            fee_collector_address: NETWORK_FEE_COLLECTOR_ADDRESS.to_string(),
            network_fee: U256::from_u64(DEFAULT_NETWORK_FEE),
            validator_fee: U256::from_u64(DEFAULT_VALIDATOR_FEE),
        }
    }
}
