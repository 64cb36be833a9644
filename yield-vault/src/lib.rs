// Copyright 2021-2022 Zenlink.
// Licensed under Apache 2.0.

//! A pooled-deposit yield vault paired with a strategy ledger.
//!
//! Deposits of an underlying "want" asset mint proportional shares.
//! Idle funds are routed to a per-vault strategy account by `earn`, and the
//! keeper periodically reports compounding (`tend`) and realized yield
//! (`harvest`). Harvests assess a time-prorated management fee plus
//! performance fees for governance and the strategist, paid as freshly
//! minted shares. Withdrawals burn shares, pull any shortfall back from the
//! strategy and charge a basis-point fee to governance.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;

pub mod primitives;
mod strategy;
mod vault;
pub mod weights;

pub use pallet::*;
pub use primitives::*;
pub use strategy::*;
pub use vault::*;

use sp_arithmetic::{traits::Zero, Rounding};
use sp_runtime::traits::{AccountIdConversion, StaticLookup};
use sp_std::{collections::btree_set::BTreeSet, vec::Vec};

use frame_support::{dispatch::DispatchResult, pallet_prelude::*, traits::UnixTime, PalletId};

use orml_traits::MultiCurrency;

pub use weights::WeightInfo;

#[allow(type_alias_bounds)]
type AccountIdOf<T: Config> = <T as frame_system::Config>::AccountId;

#[allow(type_alias_bounds)]
pub type VaultInfoOf<T: Config> = VaultInfo<AccountIdOf<T>, <T as Config>::AssetId>;

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use frame_support::transactional;
	use frame_system::pallet_prelude::*;

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// The id of asset.
		type AssetId: Parameter
			+ Member
			+ Copy
			+ MaybeSerializeDeserialize
			+ Ord
			+ TypeInfo
			+ MaxEncodedLen;

		/// The trait control all assets.
		type MultiAsset: MultiCurrency<
			AccountIdOf<Self>,
			CurrencyId = Self::AssetId,
			Balance = Balance,
		>;

		/// The trait generate the share asset for a specific want asset.
		type ShareAssetGenerate: ShareAssetGenerate<Self::AssetId>;

		/// The trait get timestamp of chain.
		type TimeProvider: UnixTime;

		/// This pallet id.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;
	}

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	/// The vault configured for a specific want asset.
	#[pallet::storage]
	#[pallet::getter(fn vaults)]
	pub type Vaults<T: Config> = StorageMap<_, Blake2_128Concat, T::AssetId, VaultInfoOf<T>>;

	/// The set of tokens the strategy of a vault must never give up.
	#[pallet::storage]
	#[pallet::getter(fn protected_tokens)]
	pub type ProtectedTokens<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AssetId, BTreeSet<T::AssetId>, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		VaultCreated {
			want: T::AssetId,
			share_asset_id: T::AssetId,
			governance: T::AccountId,
			strategist: T::AccountId,
			keeper: T::AccountId,
		},
		Deposit {
			caller: T::AccountId,
			want: T::AssetId,
			amounts: Balance,
			shares: Balance,
		},
		Withdraw {
			owner: T::AccountId,
			want: T::AssetId,
			amounts: Balance,
			fee: Balance,
			shares: Balance,
		},
		WithdrawalFee {
			destination: T::AccountId,
			token: T::AssetId,
			amount: Balance,
		},
		Earn {
			want: T::AssetId,
			amounts: Balance,
		},
		Tend {
			want: T::AssetId,
		},
		Harvest {
			want: T::AssetId,
			harvested: Balance,
			duration: u64,
		},
		PerformanceFeeGovernance {
			destination: T::AccountId,
			token: T::AssetId,
			amount: Balance,
		},
		PerformanceFeeStrategist {
			destination: T::AccountId,
			token: T::AssetId,
			amount: Balance,
		},
		WithdrawToVault {
			want: T::AssetId,
			amounts: Balance,
		},
		SweepExtraToken {
			want: T::AssetId,
			token: T::AssetId,
			amounts: Balance,
			destination: T::AccountId,
		},
		AddProtectedTokens {
			want: T::AssetId,
			tokens: Vec<T::AssetId>,
		},
		UpdateWithdrawalFee {
			want: T::AssetId,
			fee: BasisPoints,
		},
		UpdatePerformanceFeeGovernance {
			want: T::AssetId,
			fee: BasisPoints,
		},
		UpdatePerformanceFeeStrategist {
			want: T::AssetId,
			fee: BasisPoints,
		},
		UpdateManagementFee {
			want: T::AssetId,
			fee: BasisPoints,
		},
		UpdateToEarn {
			want: T::AssetId,
			ratio: BasisPoints,
		},
		UpdateGovernance {
			want: T::AssetId,
			governance: T::AccountId,
		},
		UpdateStrategist {
			want: T::AssetId,
			strategist: T::AccountId,
		},
		UpdateKeeper {
			want: T::AssetId,
			keeper: T::AccountId,
		},
	}

	#[pallet::error]
	pub enum Error<T> {
		/// The vault for this want asset is already created.
		VaultExisted,
		/// No vault has been created for this want asset.
		UnknownVault,
		/// The error for generate the share asset for the want asset.
		ShareAssetError,
		/// The error generate by math calculation.
		Math,
		/// Deposits of zero are rejected.
		ZeroAmount,
		/// The caller holds fewer shares than it tries to redeem.
		ExceedMaxRedeem,
		/// The caller is neither the keeper nor governance.
		OnlyAuthorizedActors,
		/// The caller is not governance.
		OnlyGovernance,
		/// The caller is neither governance nor the strategist.
		OnlyGovernanceOrStrategist,
		/// The strategy of this vault does not support `tend`.
		NotTendable,
		/// The token is integral to the vault and can not leave the strategy.
		ProtectedToken,
		/// A fee rate exceeds its hard cap.
		FeeOverCap,
		/// A ratio exceeds the basis-point denominator.
		InvalidRatio,
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		#[pallet::weight(T::WeightInfo::create_vault())]
		#[transactional]
		pub fn create_vault(
			origin: OriginFor<T>,
			want: T::AssetId,
			params: VaultParams,
			governance: <T::Lookup as StaticLookup>::Source,
			strategist: <T::Lookup as StaticLookup>::Source,
			keeper: <T::Lookup as StaticLookup>::Source,
		) -> DispatchResult {
			ensure_root(origin)?;
			let governance = T::Lookup::lookup(governance)?;
			let strategist = T::Lookup::lookup(strategist)?;
			let keeper = T::Lookup::lookup(keeper)?;

			ensure!(params.withdrawal_fee <= WITHDRAWAL_FEE_CAP, Error::<T>::FeeOverCap);
			ensure!(params.management_fee <= MANAGEMENT_FEE_CAP, Error::<T>::FeeOverCap);
			ensure!(
				params.performance_fee_governance <= PERFORMANCE_FEE_CAP &&
					params.performance_fee_strategist <= PERFORMANCE_FEE_CAP,
				Error::<T>::FeeOverCap
			);
			ensure!(params.to_earn <= MAX_BPS, Error::<T>::InvalidRatio);

			let share_asset_id =
				T::ShareAssetGenerate::generate(want).ok_or(Error::<T>::ShareAssetError)?;

			Vaults::<T>::try_mutate_exists(want, |optional_vault| -> DispatchResult {
				ensure!(optional_vault.is_none(), Error::<T>::VaultExisted);
				*optional_vault = Some(VaultInfo {
					share_asset_id,
					governance: governance.clone(),
					strategist: strategist.clone(),
					keeper: keeper.clone(),
					withdrawal_fee: params.withdrawal_fee,
					performance_fee_governance: params.performance_fee_governance,
					performance_fee_strategist: params.performance_fee_strategist,
					management_fee: params.management_fee,
					to_earn: params.to_earn,
					tendable: params.tendable,
					last_harvested_at: T::TimeProvider::now().as_secs(),
				});
				Ok(())
			})?;

			ProtectedTokens::<T>::mutate(want, |protected| {
				protected.insert(want);
				protected.insert(share_asset_id);
			});

			Self::deposit_event(Event::VaultCreated {
				want,
				share_asset_id,
				governance,
				strategist,
				keeper,
			});

			Ok(())
		}

		#[pallet::weight(T::WeightInfo::deposit())]
		#[transactional]
		pub fn deposit(origin: OriginFor<T>, want: T::AssetId, amounts: Balance) -> DispatchResult {
			let who = ensure_signed(origin)?;
			<Self as Vault<T>>::deposit(&who, want, amounts)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::deposit_all())]
		#[transactional]
		pub fn deposit_all(origin: OriginFor<T>, want: T::AssetId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let amounts = T::MultiAsset::free_balance(want, &who);
			<Self as Vault<T>>::deposit(&who, want, amounts)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::withdraw())]
		#[transactional]
		pub fn withdraw(origin: OriginFor<T>, want: T::AssetId, shares: Balance) -> DispatchResult {
			let who = ensure_signed(origin)?;
			<Self as Vault<T>>::withdraw(&who, want, shares)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::withdraw_all())]
		#[transactional]
		pub fn withdraw_all(origin: OriginFor<T>, want: T::AssetId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let share_asset_id = <Self as Vault<T>>::share_asset(want)?;
			let shares = T::MultiAsset::free_balance(share_asset_id, &who);
			<Self as Vault<T>>::withdraw(&who, want, shares)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::earn())]
		#[transactional]
		pub fn earn(origin: OriginFor<T>, want: T::AssetId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_authorized_actor(&vault, &who)?;
			<Self as Vault<T>>::earn(want)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::tend())]
		#[transactional]
		pub fn tend(origin: OriginFor<T>, want: T::AssetId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_authorized_actor(&vault, &who)?;
			<Self as Strategy<T>>::tend(want)
		}

		#[pallet::weight(T::WeightInfo::harvest())]
		#[transactional]
		pub fn harvest(
			origin: OriginFor<T>,
			want: T::AssetId,
			harvested: Balance,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_authorized_actor(&vault, &who)?;
			<Self as Strategy<T>>::harvest(want, harvested)
		}

		#[pallet::weight(T::WeightInfo::report_additional_token())]
		#[transactional]
		pub fn report_additional_token(
			origin: OriginFor<T>,
			want: T::AssetId,
			token: T::AssetId,
			amounts: Balance,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_authorized_actor(&vault, &who)?;
			<Self as Strategy<T>>::report_additional_token(want, token, amounts)
		}

		#[pallet::weight(T::WeightInfo::withdraw_to_vault())]
		#[transactional]
		pub fn withdraw_to_vault(origin: OriginFor<T>, want: T::AssetId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_governance(&vault, &who)?;
			<Self as Strategy<T>>::withdraw_to_vault(want)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::sweep_extra_token())]
		#[transactional]
		pub fn sweep_extra_token(
			origin: OriginFor<T>,
			want: T::AssetId,
			token: T::AssetId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_governance_or_strategist(&vault, &who)?;
			<Self as Strategy<T>>::sweep_extra_token(&who, want, token)?;
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::add_protected_tokens())]
		#[transactional]
		pub fn add_protected_tokens(
			origin: OriginFor<T>,
			want: T::AssetId,
			tokens: Vec<T::AssetId>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let vault = Self::vault_info(want)?;
			Self::ensure_governance(&vault, &who)?;

			ProtectedTokens::<T>::mutate(want, |protected| {
				for token in tokens.iter() {
					protected.insert(*token);
				}
			});

			Self::deposit_event(Event::AddProtectedTokens { want, tokens });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_withdrawal_fee(
			origin: OriginFor<T>,
			want: T::AssetId,
			fee: BasisPoints,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(fee <= WITHDRAWAL_FEE_CAP, Error::<T>::FeeOverCap);
			Self::try_mutate_vault(want, &who, |vault| vault.withdrawal_fee = fee)?;
			Self::deposit_event(Event::UpdateWithdrawalFee { want, fee });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_performance_fee_governance(
			origin: OriginFor<T>,
			want: T::AssetId,
			fee: BasisPoints,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(fee <= PERFORMANCE_FEE_CAP, Error::<T>::FeeOverCap);
			Self::try_mutate_vault(want, &who, |vault| vault.performance_fee_governance = fee)?;
			Self::deposit_event(Event::UpdatePerformanceFeeGovernance { want, fee });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_performance_fee_strategist(
			origin: OriginFor<T>,
			want: T::AssetId,
			fee: BasisPoints,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(fee <= PERFORMANCE_FEE_CAP, Error::<T>::FeeOverCap);
			Self::try_mutate_vault(want, &who, |vault| vault.performance_fee_strategist = fee)?;
			Self::deposit_event(Event::UpdatePerformanceFeeStrategist { want, fee });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_management_fee(
			origin: OriginFor<T>,
			want: T::AssetId,
			fee: BasisPoints,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(fee <= MANAGEMENT_FEE_CAP, Error::<T>::FeeOverCap);
			Self::try_mutate_vault(want, &who, |vault| vault.management_fee = fee)?;
			Self::deposit_event(Event::UpdateManagementFee { want, fee });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_to_earn(
			origin: OriginFor<T>,
			want: T::AssetId,
			ratio: BasisPoints,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(ratio <= MAX_BPS, Error::<T>::InvalidRatio);
			Self::try_mutate_vault(want, &who, |vault| vault.to_earn = ratio)?;
			Self::deposit_event(Event::UpdateToEarn { want, ratio });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_governance(
			origin: OriginFor<T>,
			want: T::AssetId,
			governance: <T::Lookup as StaticLookup>::Source,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let governance = T::Lookup::lookup(governance)?;
			Self::try_mutate_vault(want, &who, |vault| vault.governance = governance.clone())?;
			Self::deposit_event(Event::UpdateGovernance { want, governance });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_strategist(
			origin: OriginFor<T>,
			want: T::AssetId,
			strategist: <T::Lookup as StaticLookup>::Source,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let strategist = T::Lookup::lookup(strategist)?;
			Self::try_mutate_vault(want, &who, |vault| vault.strategist = strategist.clone())?;
			Self::deposit_event(Event::UpdateStrategist { want, strategist });
			Ok(())
		}

		#[pallet::weight(T::WeightInfo::update_config())]
		#[transactional]
		pub fn set_keeper(
			origin: OriginFor<T>,
			want: T::AssetId,
			keeper: <T::Lookup as StaticLookup>::Source,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let keeper = T::Lookup::lookup(keeper)?;
			Self::try_mutate_vault(want, &who, |vault| vault.keeper = keeper.clone())?;
			Self::deposit_event(Event::UpdateKeeper { want, keeper });
			Ok(())
		}
	}
}

impl<T: Config> Pallet<T> {
	pub fn vault_account_id(want: T::AssetId) -> T::AccountId {
		T::PalletId::get().into_sub_account_truncating((b"vault", want))
	}

	pub fn strategy_account_id(want: T::AssetId) -> T::AccountId {
		T::PalletId::get().into_sub_account_truncating((b"strat", want))
	}

	pub fn vault_info(want: T::AssetId) -> Result<VaultInfoOf<T>, DispatchError> {
		Self::vaults(want).ok_or_else(|| Error::<T>::UnknownVault.into())
	}

	fn ensure_authorized_actor(vault: &VaultInfoOf<T>, who: &T::AccountId) -> DispatchResult {
		ensure!(
			*who == vault.keeper || *who == vault.governance,
			Error::<T>::OnlyAuthorizedActors
		);
		Ok(())
	}

	fn ensure_governance(vault: &VaultInfoOf<T>, who: &T::AccountId) -> DispatchResult {
		ensure!(*who == vault.governance, Error::<T>::OnlyGovernance);
		Ok(())
	}

	fn ensure_governance_or_strategist(
		vault: &VaultInfoOf<T>,
		who: &T::AccountId,
	) -> DispatchResult {
		ensure!(
			*who == vault.governance || *who == vault.strategist,
			Error::<T>::OnlyGovernanceOrStrategist
		);
		Ok(())
	}

	fn try_mutate_vault(
		want: T::AssetId,
		who: &T::AccountId,
		mutate: impl FnOnce(&mut VaultInfoOf<T>),
	) -> DispatchResult {
		Vaults::<T>::try_mutate(want, |optional_vault| -> DispatchResult {
			let vault = optional_vault.as_mut().ok_or(Error::<T>::UnknownVault)?;
			Self::ensure_governance(vault, who)?;
			mutate(vault);
			Ok(())
		})
	}

	/// Shares minted for a fee of `fee` want units against a pool of `pool`
	/// and a share supply of `total_supply`; 1:1 when the supply is empty.
	pub(crate) fn shares_for_fee(
		fee: Balance,
		total_supply: Balance,
		pool: Balance,
	) -> Result<Balance, DispatchError> {
		if total_supply.is_zero() {
			return Ok(fee)
		}
		balance_mul_div(fee, total_supply, pool, Rounding::Down)
			.ok_or_else(|| Error::<T>::Math.into())
	}
}
