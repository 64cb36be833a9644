// Copyright 2021-2022 Zenlink.
// Licensed under Apache 2.0.

use super::*;

pub trait Strategy<T: Config> {
	/// Whether the strategy behind this vault supports `tend`.
	fn is_tendable(want: T::AssetId) -> Result<bool, DispatchError>;

	/// Compounds accrued rewards inside the position. The compounding is
	/// internal to the position, so the ledger only records that it happened.
	fn tend(want: T::AssetId) -> DispatchResult;

	/// Realizes `harvested` of yield in the want asset, assesses the
	/// management fee and both performance fees as freshly minted shares,
	/// and stamps the harvest time.
	fn harvest(want: T::AssetId, harvested: Balance) -> DispatchResult;

	/// Assesses performance fees on `amounts` of a token that is not the
	/// want asset. The fee cuts move in that token; no shares are minted and
	/// the price per share is untouched.
	fn report_additional_token(
		want: T::AssetId,
		token: T::AssetId,
		amounts: Balance,
	) -> DispatchResult;

	/// Pulls the strategy's entire deployed balance back into the vault.
	fn withdraw_to_vault(want: T::AssetId) -> Result<Balance, DispatchError>;

	/// Transfers the strategy's full balance of a non-protected `token`
	/// to `to`.
	fn sweep_extra_token(
		to: &T::AccountId,
		want: T::AssetId,
		token: T::AssetId,
	) -> Result<Balance, DispatchError>;
}

impl<T: Config> Strategy<T> for Pallet<T> {
	fn is_tendable(want: T::AssetId) -> Result<bool, DispatchError> {
		Self::vault_info(want).map(|vault| vault.tendable)
	}

	fn tend(want: T::AssetId) -> DispatchResult {
		ensure!(Self::is_tendable(want)?, Error::<T>::NotTendable);
		Self::deposit_event(Event::Tend { want });
		Ok(())
	}

	fn harvest(want: T::AssetId, harvested: Balance) -> DispatchResult {
		Vaults::<T>::try_mutate(want, |optional_vault| -> DispatchResult {
			let vault = optional_vault.as_mut().ok_or(Error::<T>::UnknownVault)?;

			let now = T::TimeProvider::now().as_secs();
			let duration = now.checked_sub(vault.last_harvested_at).ok_or(Error::<T>::Math)?;

			let total = Self::total_assets(want)?;
			// the management fee accrues on the pool as it stood before this
			// harvest landed in the strategy account.
			let pool_before_harvest = total.checked_sub(harvested).ok_or(Error::<T>::Math)?;
			let management_fee =
				prorated_management_fee(vault.management_fee, pool_before_harvest, duration)
					.ok_or(Error::<T>::Math)?;

			let governance_fee = bps_cut(harvested, vault.performance_fee_governance)
				.and_then(|fee| fee.checked_add(management_fee))
				.ok_or(Error::<T>::Math)?;
			let strategist_fee =
				bps_cut(harvested, vault.performance_fee_strategist).ok_or(Error::<T>::Math)?;

			let pool = total
				.checked_sub(governance_fee)
				.and_then(|pool| pool.checked_sub(strategist_fee))
				.ok_or(Error::<T>::Math)?;
			let total_supply = T::MultiAsset::total_issuance(vault.share_asset_id);

			let governance_shares = Self::shares_for_fee(governance_fee, total_supply, pool)?;
			T::MultiAsset::deposit(vault.share_asset_id, &vault.governance, governance_shares)?;
			Self::deposit_event(Event::PerformanceFeeGovernance {
				destination: vault.governance.clone(),
				token: vault.share_asset_id,
				amount: governance_shares,
			});

			// the governance mint dilutes the base the strategist cut is
			// priced against; this ordering is part of the contract.
			let strategist_shares = Self::shares_for_fee(
				strategist_fee,
				total_supply.checked_add(governance_shares).ok_or(Error::<T>::Math)?,
				pool.checked_add(governance_fee).ok_or(Error::<T>::Math)?,
			)?;
			T::MultiAsset::deposit(vault.share_asset_id, &vault.strategist, strategist_shares)?;
			Self::deposit_event(Event::PerformanceFeeStrategist {
				destination: vault.strategist.clone(),
				token: vault.share_asset_id,
				amount: strategist_shares,
			});

			vault.last_harvested_at = now;

			Self::deposit_event(Event::Harvest { want, harvested, duration });

			Ok(())
		})
	}

	fn report_additional_token(
		want: T::AssetId,
		token: T::AssetId,
		amounts: Balance,
	) -> DispatchResult {
		let vault = Self::vault_info(want)?;
		ensure!(!Self::protected_tokens(want).contains(&token), Error::<T>::ProtectedToken);

		let governance_fee =
			bps_cut(amounts, vault.performance_fee_governance).ok_or(Error::<T>::Math)?;
		let strategist_fee =
			bps_cut(amounts, vault.performance_fee_strategist).ok_or(Error::<T>::Math)?;

		let strategy_account = Self::strategy_account_id(want);
		T::MultiAsset::transfer(token, &strategy_account, &vault.governance, governance_fee)?;
		Self::deposit_event(Event::PerformanceFeeGovernance {
			destination: vault.governance,
			token,
			amount: governance_fee,
		});

		T::MultiAsset::transfer(token, &strategy_account, &vault.strategist, strategist_fee)?;
		Self::deposit_event(Event::PerformanceFeeStrategist {
			destination: vault.strategist,
			token,
			amount: strategist_fee,
		});

		Ok(())
	}

	fn withdraw_to_vault(want: T::AssetId) -> Result<Balance, DispatchError> {
		Self::vault_info(want)?;

		let amounts = Self::strategy_assets(want);
		T::MultiAsset::transfer(
			want,
			&Self::strategy_account_id(want),
			&Self::vault_account_id(want),
			amounts,
		)?;

		Self::deposit_event(Event::WithdrawToVault { want, amounts });

		Ok(amounts)
	}

	fn sweep_extra_token(
		to: &T::AccountId,
		want: T::AssetId,
		token: T::AssetId,
	) -> Result<Balance, DispatchError> {
		Self::vault_info(want)?;
		ensure!(!Self::protected_tokens(want).contains(&token), Error::<T>::ProtectedToken);

		let strategy_account = Self::strategy_account_id(want);
		let amounts = T::MultiAsset::free_balance(token, &strategy_account);
		T::MultiAsset::transfer(token, &strategy_account, to, amounts)?;

		Self::deposit_event(Event::SweepExtraToken {
			want,
			token,
			amounts,
			destination: to.clone(),
		});

		Ok(amounts)
	}
}
