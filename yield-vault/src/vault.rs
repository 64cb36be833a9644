// Copyright 2021-2022 Zenlink.
// Licensed under Apache 2.0.

use super::*;

pub trait Vault<T: Config> {
	/// Returns the id of the share token minted for the want asset.
	fn share_asset(want: T::AssetId) -> Result<T::AssetId, DispatchError>;

	/// Returns the total amount of the want asset managed by the vault,
	/// idle funds and deployed funds together.
	fn total_assets(want: T::AssetId) -> Result<Balance, DispatchError>;

	/// The want balance sitting idle in the vault account.
	fn idle_assets(want: T::AssetId) -> Balance;

	/// The want balance currently deployed in the strategy account.
	fn strategy_assets(want: T::AssetId) -> Balance;

	/// The value of one full share in want units, scaled by `PPFS_PRECISION`.
	fn price_per_full_share(want: T::AssetId) -> Result<Balance, DispatchError>;

	/// Returns the amount of shares the vault would exchange for the amount
	/// of want provided, evaluated against the pool before the contribution.
	fn convert_to_shares(want: T::AssetId, amounts: Balance) -> Result<Balance, DispatchError>;

	/// Returns the amount of want the vault would exchange for the amount of
	/// shares provided.
	fn convert_to_assets(want: T::AssetId, shares: Balance) -> Result<Balance, DispatchError>;

	/// Mints shares to `who` by depositing exactly `amounts` of want.
	fn deposit(
		who: &T::AccountId,
		want: T::AssetId,
		amounts: Balance,
	) -> Result<Balance, DispatchError>;

	/// Burns exactly `shares` from `who`, pulls any shortfall from the
	/// strategy, assesses the withdrawal fee and pays out the remainder.
	/// The fee is cash-settled: it is taken from the gross want amount and
	/// transferred to governance in want, not retained as shares.
	fn withdraw(
		who: &T::AccountId,
		want: T::AssetId,
		shares: Balance,
	) -> Result<Balance, DispatchError>;

	/// Moves the earnable portion of idle want into the strategy account.
	fn earn(want: T::AssetId) -> Result<Balance, DispatchError>;
}

impl<T: Config> Vault<T> for Pallet<T> {
	fn share_asset(want: T::AssetId) -> Result<T::AssetId, DispatchError> {
		Self::vault_info(want).map(|vault| vault.share_asset_id)
	}

	fn total_assets(want: T::AssetId) -> Result<Balance, DispatchError> {
		Self::idle_assets(want)
			.checked_add(Self::strategy_assets(want))
			.ok_or_else(|| Error::<T>::Math.into())
	}

	fn idle_assets(want: T::AssetId) -> Balance {
		T::MultiAsset::free_balance(want, &Self::vault_account_id(want))
	}

	fn strategy_assets(want: T::AssetId) -> Balance {
		T::MultiAsset::free_balance(want, &Self::strategy_account_id(want))
	}

	fn price_per_full_share(want: T::AssetId) -> Result<Balance, DispatchError> {
		let share_asset_id = Self::share_asset(want)?;
		let total_supply = T::MultiAsset::total_issuance(share_asset_id);
		if total_supply.is_zero() {
			return Ok(PPFS_PRECISION)
		}
		balance_mul_div(Self::total_assets(want)?, PPFS_PRECISION, total_supply, Rounding::Down)
			.ok_or_else(|| Error::<T>::Math.into())
	}

	fn convert_to_shares(want: T::AssetId, amounts: Balance) -> Result<Balance, DispatchError> {
		let share_asset_id = Self::share_asset(want)?;
		let total_supply = T::MultiAsset::total_issuance(share_asset_id);
		if total_supply.is_zero() {
			return Ok(amounts)
		}
		balance_mul_div(amounts, total_supply, Self::total_assets(want)?, Rounding::Down)
			.ok_or_else(|| Error::<T>::Math.into())
	}

	fn convert_to_assets(want: T::AssetId, shares: Balance) -> Result<Balance, DispatchError> {
		let share_asset_id = Self::share_asset(want)?;
		let total_supply = T::MultiAsset::total_issuance(share_asset_id);
		if total_supply.is_zero() {
			return Ok(shares)
		}
		balance_mul_div(shares, Self::total_assets(want)?, total_supply, Rounding::Down)
			.ok_or_else(|| Error::<T>::Math.into())
	}

	fn deposit(
		who: &T::AccountId,
		want: T::AssetId,
		amounts: Balance,
	) -> Result<Balance, DispatchError> {
		ensure!(!amounts.is_zero(), Error::<T>::ZeroAmount);
		let vault = Self::vault_info(want)?;

		// shares are priced against the pool before this contribution lands.
		let shares = Self::convert_to_shares(want, amounts)?;

		T::MultiAsset::transfer(want, who, &Self::vault_account_id(want), amounts)?;
		T::MultiAsset::deposit(vault.share_asset_id, who, shares)?;

		Self::deposit_event(Event::Deposit { caller: who.clone(), want, amounts, shares });

		Ok(shares)
	}

	fn withdraw(
		who: &T::AccountId,
		want: T::AssetId,
		shares: Balance,
	) -> Result<Balance, DispatchError> {
		let vault = Self::vault_info(want)?;
		ensure!(
			shares <= T::MultiAsset::free_balance(vault.share_asset_id, who),
			Error::<T>::ExceedMaxRedeem
		);

		let amounts = Self::convert_to_assets(want, shares)?;
		T::MultiAsset::withdraw(vault.share_asset_id, who, shares)?;

		let vault_account = Self::vault_account_id(want);
		let idle = T::MultiAsset::free_balance(want, &vault_account);
		if idle < amounts {
			let shortfall = amounts.checked_sub(idle).ok_or(Error::<T>::Math)?;
			T::MultiAsset::transfer(
				want,
				&Self::strategy_account_id(want),
				&vault_account,
				shortfall,
			)?;
		}

		let fee = bps_cut(amounts, vault.withdrawal_fee).ok_or(Error::<T>::Math)?;
		let net_amounts = amounts.checked_sub(fee).ok_or(Error::<T>::Math)?;

		T::MultiAsset::transfer(want, &vault_account, &vault.governance, fee)?;
		T::MultiAsset::transfer(want, &vault_account, who, net_amounts)?;

		// the fee record fires on every withdrawal, a zero fee included.
		Self::deposit_event(Event::WithdrawalFee {
			destination: vault.governance,
			token: want,
			amount: fee,
		});
		Self::deposit_event(Event::Withdraw {
			owner: who.clone(),
			want,
			amounts: net_amounts,
			fee,
			shares,
		});

		Ok(net_amounts)
	}

	fn earn(want: T::AssetId) -> Result<Balance, DispatchError> {
		let vault = Self::vault_info(want)?;
		let idle = Self::idle_assets(want);
		let amounts = bps_cut(idle, vault.to_earn).ok_or(Error::<T>::Math)?;

		T::MultiAsset::transfer(
			want,
			&Self::vault_account_id(want),
			&Self::strategy_account_id(want),
			amounts,
		)?;

		Self::deposit_event(Event::Earn { want, amounts });

		Ok(amounts)
	}
}
