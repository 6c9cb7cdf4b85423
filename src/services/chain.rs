//! On-chain access to BAMM pools and the factory.
//!
//! Reads go through [`BammReader`] and account-signed writes through
//! [`BammWriter`], so the services above them can run against in-memory
//! fakes.

use alloy::{
    primitives::{Address, TxHash, I256, U256},
    providers::DynProvider,
};
use async_trait::async_trait;

use crate::{
    error::Result,
    ethereum::{
        contracts::{IBamm, IBammFactory},
        simulate_and_send,
    },
};

/// Signed vault balances as stored by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VaultBalances {
    pub token0: I256,
    pub token1: I256,
    pub rented: I256,
}

impl VaultBalances {
    /// True when neither asset balance is held.
    pub fn is_empty(&self) -> bool {
        self.token0.is_zero() && self.token1.is_zero()
    }
}

impl From<IBamm::Vault> for VaultBalances {
    fn from(vault: IBamm::Vault) -> Self {
        Self { token0: vault.token0, token1: vault.token1, rented: vault.rented }
    }
}

/// Read-only pool and factory state.
#[async_trait]
pub trait BammReader: Send + Sync {
    /// Pools registered with `factory`, in factory order, without zero-address slots.
    async fn bamms(&self, factory: Address) -> Result<Vec<Address>>;

    /// The pool's `token0` and `token1`.
    async fn assets(&self, bamm: Address) -> Result<(Address, Address)>;

    /// Fraxswap pair, which is also the LP token lent to the pool.
    async fn pair(&self, bamm: Address) -> Result<Address>;

    /// BAMM share token minted on lend and burnt on withdraw.
    async fn share_token(&self, bamm: Address) -> Result<Address>;

    async fn rented_multiplier(&self, bamm: Address) -> Result<U256>;

    async fn is_user(&self, bamm: Address, user: Address) -> Result<bool>;

    async fn user_vault(&self, bamm: Address, user: Address) -> Result<VaultBalances>;
}

/// Pool writes signed by one acting account. Each call returns once the
/// transaction is mined.
#[async_trait]
pub trait BammWriter: Send + Sync {
    async fn mint(&self, bamm: Address, to: Address, lp_in: U256) -> Result<TxHash>;

    async fn redeem(&self, bamm: Address, to: Address, bamm_in: U256) -> Result<TxHash>;

    async fn execute_actions(&self, bamm: Address, action: IBamm::Action) -> Result<TxHash>;
}

/// [`BammReader`] over a JSON-RPC provider.
#[derive(Clone)]
pub struct OnChainReader {
    provider: DynProvider,
}

impl OnChainReader {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    fn pool(&self, bamm: Address) -> IBamm::IBammInstance<DynProvider> {
        IBamm::new(bamm, self.provider.clone())
    }
}

#[async_trait]
impl BammReader for OnChainReader {
    async fn bamms(&self, factory: Address) -> Result<Vec<Address>> {
        let contract = IBammFactory::new(factory, self.provider.clone());
        let bamms: Vec<Address> = contract.bammsArray().call().await?;

        let total = bamms.len();
        let bamms: Vec<Address> = bamms.into_iter().filter(|b| !b.is_zero()).collect();
        tracing::debug!(factory = %factory, total, registered = bamms.len(), "Listed BAMMs");
        Ok(bamms)
    }

    async fn assets(&self, bamm: Address) -> Result<(Address, Address)> {
        let pool = self.pool(bamm);
        let token0 = pool.token0().call().await?;
        let token1 = pool.token1().call().await?;
        Ok((token0, token1))
    }

    async fn pair(&self, bamm: Address) -> Result<Address> {
        Ok(self.pool(bamm).pair().call().await?)
    }

    async fn share_token(&self, bamm: Address) -> Result<Address> {
        Ok(self.pool(bamm).iBammErc20().call().await?)
    }

    async fn rented_multiplier(&self, bamm: Address) -> Result<U256> {
        let multiplier = self.pool(bamm).rentedMultiplier().call().await?;
        tracing::debug!(bamm = %bamm, rented_multiplier = %multiplier, "Read rent multiplier");
        Ok(multiplier)
    }

    async fn is_user(&self, bamm: Address, user: Address) -> Result<bool> {
        Ok(self.pool(bamm).isUser(user).call().await?)
    }

    async fn user_vault(&self, bamm: Address, user: Address) -> Result<VaultBalances> {
        Ok(self.pool(bamm).getUserVault(user).call().await?.into())
    }
}

/// [`BammWriter`] over a wallet-filled provider.
#[derive(Clone)]
pub struct OnChainWriter {
    provider: DynProvider,
    account: Address,
}

impl OnChainWriter {
    pub fn new(provider: DynProvider, account: Address) -> Self {
        Self { provider, account }
    }
}

#[async_trait]
impl BammWriter for OnChainWriter {
    async fn mint(&self, bamm: Address, to: Address, lp_in: U256) -> Result<TxHash> {
        let pool = IBamm::new(bamm, self.provider.clone());
        simulate_and_send(pool.mint(to, lp_in).from(self.account), "mint").await
    }

    async fn redeem(&self, bamm: Address, to: Address, bamm_in: U256) -> Result<TxHash> {
        let pool = IBamm::new(bamm, self.provider.clone());
        simulate_and_send(pool.redeem(to, bamm_in).from(self.account), "redeem").await
    }

    async fn execute_actions(&self, bamm: Address, action: IBamm::Action) -> Result<TxHash> {
        let pool = IBamm::new(bamm, self.provider.clone());
        simulate_and_send(pool.executeActions(action).from(self.account), "executeActions").await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{ethereum::constants::WAD, services::token_guard::TokenLedger};
    use alloy::primitives::B256;
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    /// Side effect or notable read seen by [`FakeChain`], in call order.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum ChainCall {
        Approve { token: Address, spender: Address, amount: U256 },
        RentedMultiplier(Address),
        Mint { bamm: Address, to: Address, amount: U256 },
        Redeem { bamm: Address, to: Address, amount: U256 },
        ExecuteActions { bamm: Address, action: IBamm::Action },
    }

    /// One pool's worth of chain state, shared between clones so the same
    /// fake can act as reader, writer and token ledger.
    #[derive(Clone)]
    pub(crate) struct FakeChain {
        pub token0: Address,
        pub token1: Address,
        pub pair: Address,
        pub share_token: Address,
        pub rented_multiplier: U256,
        pub balance: U256,
        /// Factory listing returned for any factory address.
        pub bamms: Vec<Address>,
        /// Per-pool pair overrides.
        pub pairs: HashMap<Address, Address>,
        /// Vaults of pools where the user is registered.
        pub vaults: HashMap<Address, VaultBalances>,
        pub allowance: Arc<Mutex<U256>>,
        pub calls: Arc<Mutex<Vec<ChainCall>>>,
    }

    impl FakeChain {
        pub(crate) fn new() -> Self {
            Self {
                token0: Address::repeat_byte(0xa0),
                token1: Address::repeat_byte(0xa1),
                pair: Address::repeat_byte(0xc0),
                share_token: Address::repeat_byte(0xd0),
                rented_multiplier: WAD,
                balance: U256::MAX,
                bamms: Vec::new(),
                pairs: HashMap::new(),
                vaults: HashMap::new(),
                allowance: Arc::new(Mutex::new(U256::ZERO)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn with_allowance(self, allowance: U256) -> Self {
            *self.allowance.lock().unwrap() = allowance;
            self
        }

        pub(crate) fn calls(&self) -> Vec<ChainCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: ChainCall) -> TxHash {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call);
            B256::with_last_byte(calls.len() as u8)
        }
    }

    #[async_trait]
    impl BammReader for FakeChain {
        async fn bamms(&self, _factory: Address) -> Result<Vec<Address>> {
            Ok(self.bamms.clone())
        }

        async fn assets(&self, _bamm: Address) -> Result<(Address, Address)> {
            Ok((self.token0, self.token1))
        }

        async fn pair(&self, bamm: Address) -> Result<Address> {
            Ok(self.pairs.get(&bamm).copied().unwrap_or(self.pair))
        }

        async fn share_token(&self, _bamm: Address) -> Result<Address> {
            Ok(self.share_token)
        }

        async fn rented_multiplier(&self, bamm: Address) -> Result<U256> {
            self.record(ChainCall::RentedMultiplier(bamm));
            Ok(self.rented_multiplier)
        }

        async fn is_user(&self, bamm: Address, _user: Address) -> Result<bool> {
            Ok(self.vaults.contains_key(&bamm))
        }

        async fn user_vault(&self, bamm: Address, _user: Address) -> Result<VaultBalances> {
            Ok(self.vaults.get(&bamm).copied().unwrap_or_default())
        }
    }

    #[async_trait]
    impl BammWriter for FakeChain {
        async fn mint(&self, bamm: Address, to: Address, lp_in: U256) -> Result<TxHash> {
            Ok(self.record(ChainCall::Mint { bamm, to, amount: lp_in }))
        }

        async fn redeem(&self, bamm: Address, to: Address, bamm_in: U256) -> Result<TxHash> {
            Ok(self.record(ChainCall::Redeem { bamm, to, amount: bamm_in }))
        }

        async fn execute_actions(&self, bamm: Address, action: IBamm::Action) -> Result<TxHash> {
            Ok(self.record(ChainCall::ExecuteActions { bamm, action }))
        }
    }

    #[async_trait]
    impl TokenLedger for FakeChain {
        async fn balance_of(&self, _token: Address, _owner: Address) -> Result<U256> {
            Ok(self.balance)
        }

        async fn allowance(
            &self,
            _token: Address,
            _owner: Address,
            _spender: Address,
        ) -> Result<U256> {
            Ok(*self.allowance.lock().unwrap())
        }

        async fn decimals(&self, _token: Address) -> Result<u8> {
            Ok(18)
        }

        async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
            *self.allowance.lock().unwrap() = amount;
            Ok(self.record(ChainCall::Approve { token, spender, amount }))
        }
    }

    #[test]
    fn test_vault_from_binding() {
        let one = I256::from_raw(WAD);
        let vault: VaultBalances =
            IBamm::Vault { token0: one, token1: I256::ZERO, rented: one }.into();
        assert_eq!(vault.rented, one);
        assert!(!vault.is_empty());
        assert!(VaultBalances::default().is_empty());
    }
}
