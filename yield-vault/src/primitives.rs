// Copyright 2021-2022 Zenlink.
// Licensed under Apache 2.0.

use super::*;
use sp_arithmetic::{helpers_128bit::*, Rounding};

pub type Balance = u128;
pub type BasisPoints = u128;
pub type Timestamp = u64;

/// The basis-point denominator used by every fee-rate calculation.
pub const MAX_BPS: Balance = 10_000;

/// Seconds in a Gregorian year, used to prorate the management fee.
pub const SECS_PER_YEAR: u64 = 31_556_952;

/// Scale of the price-per-full-share ratio.
pub const PPFS_PRECISION: Balance = 1_000_000_000_000_000_000;

/// Hard caps a vault configuration can never exceed.
pub const WITHDRAWAL_FEE_CAP: BasisPoints = 200;
pub const MANAGEMENT_FEE_CAP: BasisPoints = 200;
pub const PERFORMANCE_FEE_CAP: BasisPoints = 3_000;

pub fn balance_mul_div(x: Balance, y: Balance, z: Balance, rounding: Rounding) -> Option<Balance> {
	multiply_by_rational_with_rounding(x, y, z, rounding)
}

/// The basis-point cut of `amounts`, rounded down. Shared by the withdrawal
/// fee and both performance-fee paths.
pub fn bps_cut(amounts: Balance, rate: BasisPoints) -> Option<Balance> {
	balance_mul_div(amounts, rate, MAX_BPS, Rounding::Down)
}

/// The management fee accrued on `pool` over `duration` seconds at an
/// annualized basis-point `rate`.
pub fn prorated_management_fee(
	rate: BasisPoints,
	pool: Balance,
	duration: u64,
) -> Option<Balance> {
	balance_mul_div(
		pool,
		rate.checked_mul(duration as Balance)?,
		(SECS_PER_YEAR as Balance).checked_mul(MAX_BPS)?,
		Rounding::Down,
	)
}

/// The full configuration and accounting state of one vault.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub struct VaultInfo<AccountId, AssetId> {
	/// The share token minted against deposits of the want asset.
	pub share_asset_id: AssetId,
	pub governance: AccountId,
	pub strategist: AccountId,
	pub keeper: AccountId,
	/// Fee on the gross underlying amount of every withdrawal, in bps.
	pub withdrawal_fee: BasisPoints,
	/// Governance cut of every harvested amount, in bps.
	pub performance_fee_governance: BasisPoints,
	/// Strategist cut of every harvested amount, in bps.
	pub performance_fee_strategist: BasisPoints,
	/// Annualized fee on the pre-harvest pool, in bps per year.
	pub management_fee: BasisPoints,
	/// Share of idle funds moved to the strategy by `earn`, in bps.
	pub to_earn: BasisPoints,
	/// Whether the strategy supports periodic compounding via `tend`.
	pub tendable: bool,
	/// Unix seconds of the last want-asset harvest.
	pub last_harvested_at: Timestamp,
}

/// The caller-supplied part of a vault configuration.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub struct VaultParams {
	pub withdrawal_fee: BasisPoints,
	pub performance_fee_governance: BasisPoints,
	pub performance_fee_strategist: BasisPoints,
	pub management_fee: BasisPoints,
	pub to_earn: BasisPoints,
	pub tendable: bool,
}

pub trait ShareAssetGenerate<AssetId> {
	fn generate(asset: AssetId) -> Option<AssetId>;
}
