//! MCP server implementation.

use std::sync::Arc;

use alloy::primitives::Address;
use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;

use crate::{
    config::Config,
    error::AppError,
    ethereum::{EthereumClient, WalletManager},
    services::{
        format_positions, BammReader, BammService, FraxPoolsApi, OnChainReader, PoolStatsService,
        PoolsApi, PositionsService, TokenResolver,
    },
    types::{parse_wad, ActionBuilder, TokenRef},
};

/// BAMM MCP Server.
///
/// Exposes lending, borrowing and collateral management on Frax BAMM pools,
/// plus read-only position and pool listings.
#[derive(Clone)]
pub struct BammServer {
    config: Config,
    bamm_service: BammService,
    positions_service: PositionsService,
    pool_stats_service: PoolStatsService,
    tool_router: ToolRouter<Self>,
}

impl BammServer {
    /// Create a new BAMM MCP Server.
    ///
    /// No network calls are made here. The private key is only parsed when a
    /// tool that needs the acting account is invoked, so a server without a
    /// key still answers pool stats requests.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!(config = ?config, "Initializing BAMM MCP Server");

        let client = Arc::new(EthereumClient::new(&config.rpc_url)?);
        let api: Arc<dyn PoolsApi> = Arc::new(FraxPoolsApi::new(config.pools_api_url.clone())?);
        let reader: Arc<dyn BammReader> = Arc::new(OnChainReader::new(client.provider().clone()));

        let bamm_service = BammService::new(
            client,
            reader.clone(),
            TokenResolver::new(api.clone()),
            ActionBuilder::default(),
        );
        let positions_service = PositionsService::new(reader.clone(), api.clone());
        let pool_stats_service = PoolStatsService::new(reader, api);

        tracing::info!("BAMM MCP Server initialized successfully");

        Ok(Self {
            config,
            bamm_service,
            positions_service,
            pool_stats_service,
            tool_router: Self::tool_router(),
        })
    }

    /// Acting account for this invocation.
    fn wallet(&self) -> Result<WalletManager, AppError> {
        WalletManager::from_optional_key(self.config.private_key.as_deref())
    }
}

/// Input parameters for the lend and withdraw tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolAmountInput {
    /// BAMM pool contract address (0x...).
    pub bamm_address: String,
    /// Amount in human-readable units, 18 decimals (e.g., "1.5").
    pub amount: String,
}

/// Input parameters for the borrow and repay tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowInput {
    /// BAMM pool contract address (0x...).
    pub bamm_address: String,
    /// Amount in human-readable units, 18 decimals (e.g., "1.5").
    pub amount: String,
    /// Address of the borrowed token. Either this or `borrowTokenSymbol` is required.
    #[serde(default)]
    pub borrow_token: Option<String>,
    /// Symbol of the borrowed token (e.g., "FRAX"). Takes precedence over `borrowToken`.
    #[serde(default)]
    pub borrow_token_symbol: Option<String>,
}

/// Input parameters for the add_collateral and remove_collateral tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollateralInput {
    /// BAMM pool contract address (0x...).
    pub bamm_address: String,
    /// Amount in human-readable units, 18 decimals (e.g., "1.5").
    pub amount: String,
    /// Address of the collateral token. Either this or `collateralTokenSymbol` is required.
    #[serde(default)]
    pub collateral_token: Option<String>,
    /// Symbol of the collateral token (e.g., "IQT"). Takes precedence over `collateralToken`.
    #[serde(default)]
    pub collateral_token_symbol: Option<String>,
}

/// Parse and validate an Ethereum address from a string.
///
/// The address must be `0x` followed by 40 hex characters. Checksum casing is
/// not enforced.
pub fn parse_address(s: &str) -> Result<Address, AppError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(AppError::InvalidAddress("Address cannot be empty".into()));
    }

    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(AppError::InvalidAddress(format!("Address must start with '0x': {}", s)));
    }

    // 0x + 40 hex chars
    if trimmed.len() != 42 {
        return Err(AppError::InvalidAddress(format!(
            "Address must be 42 characters (0x + 40 hex chars), got {}: {}",
            trimmed.len(),
            s
        )));
    }

    trimmed
        .parse::<Address>()
        .map_err(|e| AppError::InvalidAddress(format!("Invalid address format '{}': {}", s, e)))
}

/// Build a [`TokenRef`] from a tool's optional address and symbol fields.
///
/// A supplied address must be well-formed even when the symbol wins.
pub fn token_ref(address: Option<&str>, symbol: Option<&str>) -> Result<TokenRef, AppError> {
    let address = address.filter(|a| !a.trim().is_empty()).map(parse_address).transpose()?;
    TokenRef::from_parts(address, symbol)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl BammServer {
    /// Lend Fraxswap LP tokens to a BAMM pool.
    #[tool(
        description = "Lend Fraxswap LP tokens to a BAMM pool. Approves the LP token if needed and mints BAMM share tokens to the caller."
    )]
    pub async fn lend(
        &self,
        Parameters(input): Parameters<PoolAmountInput>,
    ) -> Result<String, McpError> {
        tracing::info!(bamm = %input.bamm_address, amount = %input.amount, "lend called");

        let wallet = self.wallet()?;
        let bamm = parse_address(&input.bamm_address)?;
        let amount = parse_wad(&input.amount)?;

        let account = self.bamm_service.for_account(&wallet).await?;
        let result = account.lend(bamm, amount).await?;
        tracing::info!(tx_hash = %result.tx_hash, "lend confirmed");
        to_json(&result)
    }

    /// Redeem BAMM share tokens for the underlying LP tokens.
    #[tool(
        description = "Withdraw LP tokens from a BAMM pool by redeeming BAMM share tokens. Approves the share token if needed."
    )]
    pub async fn withdraw(
        &self,
        Parameters(input): Parameters<PoolAmountInput>,
    ) -> Result<String, McpError> {
        tracing::info!(bamm = %input.bamm_address, amount = %input.amount, "withdraw called");

        let wallet = self.wallet()?;
        let bamm = parse_address(&input.bamm_address)?;
        let amount = parse_wad(&input.amount)?;

        let account = self.bamm_service.for_account(&wallet).await?;
        let result = account.withdraw(bamm, amount).await?;
        tracing::info!(tx_hash = %result.tx_hash, "withdraw confirmed");
        to_json(&result)
    }

    #[tool(
        description = "Borrow one of a BAMM pool's tokens against deposited collateral. The token can be given by address (borrowToken) or symbol (borrowTokenSymbol)."
    )]
    pub async fn borrow(
        &self,
        Parameters(input): Parameters<BorrowInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            bamm = %input.bamm_address,
            amount = %input.amount,
            token = ?input.borrow_token,
            symbol = ?input.borrow_token_symbol,
            "borrow called"
        );

        let wallet = self.wallet()?;
        let bamm = parse_address(&input.bamm_address)?;
        let amount = parse_wad(&input.amount)?;
        let token =
            token_ref(input.borrow_token.as_deref(), input.borrow_token_symbol.as_deref())?;

        let account = self.bamm_service.for_account(&wallet).await?;
        let result = account.borrow(bamm, token, amount).await?;
        tracing::info!(tx_hash = %result.tx_hash, "borrow confirmed");
        to_json(&result)
    }

    #[tool(
        description = "Repay borrowed tokens to a BAMM pool. The token can be given by address (borrowToken) or symbol (borrowTokenSymbol)."
    )]
    pub async fn repay(
        &self,
        Parameters(input): Parameters<BorrowInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            bamm = %input.bamm_address,
            amount = %input.amount,
            token = ?input.borrow_token,
            symbol = ?input.borrow_token_symbol,
            "repay called"
        );

        let wallet = self.wallet()?;
        let bamm = parse_address(&input.bamm_address)?;
        let amount = parse_wad(&input.amount)?;
        let token =
            token_ref(input.borrow_token.as_deref(), input.borrow_token_symbol.as_deref())?;

        let account = self.bamm_service.for_account(&wallet).await?;
        let result = account.repay(bamm, token, amount).await?;
        tracing::info!(tx_hash = %result.tx_hash, "repay confirmed");
        to_json(&result)
    }

    #[tool(
        description = "Deposit collateral into a BAMM pool. The token can be given by address (collateralToken) or symbol (collateralTokenSymbol)."
    )]
    pub async fn add_collateral(
        &self,
        Parameters(input): Parameters<CollateralInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            bamm = %input.bamm_address,
            amount = %input.amount,
            token = ?input.collateral_token,
            symbol = ?input.collateral_token_symbol,
            "add_collateral called"
        );

        let wallet = self.wallet()?;
        let bamm = parse_address(&input.bamm_address)?;
        let amount = parse_wad(&input.amount)?;
        let token = token_ref(
            input.collateral_token.as_deref(),
            input.collateral_token_symbol.as_deref(),
        )?;

        let account = self.bamm_service.for_account(&wallet).await?;
        let result = account.add_collateral(bamm, token, amount).await?;
        tracing::info!(tx_hash = %result.tx_hash, "add_collateral confirmed");
        to_json(&result)
    }

    #[tool(
        description = "Withdraw collateral from a BAMM pool. The token can be given by address (collateralToken) or symbol (collateralTokenSymbol)."
    )]
    pub async fn remove_collateral(
        &self,
        Parameters(input): Parameters<CollateralInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            bamm = %input.bamm_address,
            amount = %input.amount,
            token = ?input.collateral_token,
            symbol = ?input.collateral_token_symbol,
            "remove_collateral called"
        );

        let wallet = self.wallet()?;
        let bamm = parse_address(&input.bamm_address)?;
        let amount = parse_wad(&input.amount)?;
        let token = token_ref(
            input.collateral_token.as_deref(),
            input.collateral_token_symbol.as_deref(),
        )?;

        let account = self.bamm_service.for_account(&wallet).await?;
        let result = account.remove_collateral(bamm, token, amount).await?;
        tracing::info!(tx_hash = %result.tx_hash, "remove_collateral confirmed");
        to_json(&result)
    }

    /// List the caller's positions in every BAMM pool of the configured factory.
    ///
    /// Pools where both vault balances are zero are left out.
    #[tool(
        description = "List the caller's BAMM positions: vault balances of both pool tokens and rented amount, with pool names and symbols. Requires the BAMM_FACTORY_ADDRESS environment variable."
    )]
    pub async fn get_positions(&self) -> Result<String, McpError> {
        tracing::info!("get_positions called");

        let wallet = self.wallet()?;
        let factory = self.config.require_factory()?;

        let positions = self.positions_service.get_positions(factory, wallet.address()).await?;
        to_json(&format_positions(wallet.address(), &positions))
    }

    #[tool(
        description = "List all BAMM-backed Fraxswap pools with locked token amounts and TVL, sorted by TVL descending. Requires the BAMM_FACTORY_ADDRESS environment variable."
    )]
    pub async fn get_pool_stats(&self) -> Result<String, McpError> {
        tracing::info!("get_pool_stats called");

        let factory = self.config.require_factory()?;
        let report = self.pool_stats_service.get_pool_stats(factory).await?;
        to_json(&report)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for BammServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bamm-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "BAMM MCP Server for Fraxtal. Provides tools to lend, withdraw, borrow, repay, \
                 add and remove collateral on BAMM pools, and to list positions and pool stats. \
                 All amounts use 18 decimals. Listing positions and pool stats requires \
                 BAMM_FACTORY_ADDRESS to be set."
                    .to_string(),
            ),
        }
    }
}
