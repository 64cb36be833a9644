// Copyright 2021-2022 Zenlink.
// Licensed under Apache 2.0.

use super::*;
use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use frame_support::{
	assert_ok,
	pallet_prelude::GenesisBuild,
	parameter_types,
	traits::{ConstU32, Contains},
	PalletId,
};
use sp_core::H256;
use sp_runtime::{
	testing::Header,
	traits::{BlakeTwo256, IdentityLookup},
	RuntimeDebug,
};

use orml_traits::parameter_type_with_key;

use crate as vault;
use crate::primitives::ShareAssetGenerate;

type UncheckedExtrinsic = frame_system::mocking::MockUncheckedExtrinsic<Test>;
type Block = frame_system::mocking::MockBlock<Test>;

pub type Moment = u64;
pub const MILLISECS_PER_BLOCK: Moment = 12000;
pub const SLOT_DURATION: Moment = MILLISECS_PER_BLOCK;

parameter_types! {
	pub const BlockHashCount: u64 = 250;
	pub const YieldVaultPalletId: PalletId = PalletId(*b"/yldvalt");
	pub const MaxReserves: u32 = 50;
	pub const MaxLocks: u32 = 50;
	pub const MinimumPeriod: Moment = SLOT_DURATION / 2;
}

parameter_type_with_key! {
	pub ExistentialDeposits: |_currency_id: CurrencyId| -> u128 {
		0
	};
}

pub type AccountId = u128;
pub type TokenSymbol = u8;

pub struct MockDustRemovalWhitelist;
impl Contains<AccountId> for MockDustRemovalWhitelist {
	fn contains(_a: &AccountId) -> bool {
		true
	}
}

#[derive(
	Encode,
	Decode,
	Eq,
	PartialEq,
	Copy,
	Clone,
	RuntimeDebug,
	PartialOrd,
	MaxEncodedLen,
	Ord,
	TypeInfo,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum CurrencyId {
	Token(TokenSymbol),
	ShareToken(TokenSymbol),
}

impl frame_system::Config for Test {
	type BaseCallFilter = frame_support::traits::Everything;
	type RuntimeOrigin = RuntimeOrigin;
	type Index = u64;
	type RuntimeCall = RuntimeCall;
	type BlockNumber = u64;
	type Hash = H256;
	type Hashing = BlakeTwo256;
	type AccountId = u128;
	type Lookup = IdentityLookup<Self::AccountId>;
	type Header = Header;
	type RuntimeEvent = RuntimeEvent;
	type BlockHashCount = BlockHashCount;
	type DbWeight = ();
	type Version = ();
	type AccountData = ();
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type SystemWeightInfo = ();
	type PalletInfo = PalletInfo;
	type BlockWeights = ();
	type BlockLength = ();
	type SS58Prefix = ();
	type OnSetCode = ();
	type MaxConsumers = frame_support::traits::ConstU32<16>;
}

pub type ReserveIdentifier = [u8; 8];
impl orml_tokens::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Balance = u128;
	type Amount = i128;
	type CurrencyId = CurrencyId;
	type WeightInfo = ();
	type ExistentialDeposits = ExistentialDeposits;
	type CurrencyHooks = ();
	type MaxLocks = MaxLocks;
	type DustRemovalWhitelist = MockDustRemovalWhitelist;
	type ReserveIdentifier = ReserveIdentifier;
	type MaxReserves = ConstU32<100_000>;
}

impl pallet_timestamp::Config for Test {
	type MinimumPeriod = MinimumPeriod;
	type Moment = u64;
	type OnTimestampSet = ();
	type WeightInfo = ();
}

pub struct ShareAssetGenerator;

impl ShareAssetGenerate<CurrencyId> for ShareAssetGenerator {
	fn generate(asset: CurrencyId) -> Option<CurrencyId> {
		match asset {
			CurrencyId::Token(sym) => Some(CurrencyId::ShareToken(sym)),
			CurrencyId::ShareToken(_) => None,
		}
	}
}

impl Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AssetId = CurrencyId;
	type MultiAsset = Tokens;
	type ShareAssetGenerate = ShareAssetGenerator;
	type TimeProvider = Timestamp;
	type PalletId = YieldVaultPalletId;
	type WeightInfo = ();
}

frame_support::construct_runtime!(
	pub enum Test where
		Block = Block,
		NodeBlock = Block,
		UncheckedExtrinsic = UncheckedExtrinsic,
	{
		System: frame_system::{Pallet, Call, Config, Storage, Event<T>} = 0,
		Timestamp: pallet_timestamp::{Pallet, Call, Storage, Inherent} = 1,

		Tokens: orml_tokens::{Pallet, Storage, Event<T>, Config<T>} = 11,
		Vaults: vault::{Pallet, Call, Storage, Event<T>} = 20,
	}
);

pub type VaultPallet = Pallet<Test>;

pub const ALICE: u128 = 1;
pub const BOB: u128 = 2;
pub const CHARLIE: u128 = 3;
pub const GOVERNANCE: u128 = 10;
pub const STRATEGIST: u128 = 11;
pub const KEEPER: u128 = 12;

pub const WANT_SYMBOL: u8 = 1;
pub const WANT2_SYMBOL: u8 = 2;
pub const EXTRA_SYMBOL: u8 = 3;

pub const UNIT: u128 = 1_000_000_000_000_000_000;

pub fn new_test_ext() -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::default().build_storage::<Test>().unwrap();

	orml_tokens::GenesisConfig::<Test> {
		balances: vec![
			(ALICE, CurrencyId::Token(WANT_SYMBOL), UNIT * 100_000_000),
			(ALICE, CurrencyId::Token(WANT2_SYMBOL), UNIT * 100_000_000),
			(ALICE, CurrencyId::Token(EXTRA_SYMBOL), UNIT * 100_000_000),
			(BOB, CurrencyId::Token(WANT_SYMBOL), UNIT * 100),
			(BOB, CurrencyId::Token(WANT2_SYMBOL), UNIT * 100),
			(CHARLIE, CurrencyId::Token(WANT_SYMBOL), UNIT * 100),
		],
	}
	.assimilate_storage(&mut t)
	.unwrap();

	t.into()
}

pub fn get_user_balance(currency_id: CurrencyId, user: &AccountId) -> Balance {
	<Test as Config>::MultiAsset::free_balance(currency_id, user)
}

pub fn transfer_from(currency_id: CurrencyId, from: &AccountId, amount: Balance, to: &AccountId) {
	assert_ok!(Tokens::transfer(
		RuntimeOrigin::signed(*from),
		*to,
		currency_id,
		amount
	));
}

pub fn now_seconds() -> u64 {
	Timestamp::now() / 1000
}

// timestamp in second
pub fn set_block_timestamp(timestamp: u64) {
	Timestamp::set_timestamp(timestamp * 1000);
}

pub fn mine_block() {
	System::set_block_number(System::block_number() + 1);
	set_block_timestamp(now_seconds() + MILLISECS_PER_BLOCK / 1000);
}

/// Advance the chain clock by `secs` in a fresh block.
pub fn sleep(secs: u64) {
	System::set_block_number(System::block_number() + 1);
	set_block_timestamp(now_seconds() + secs);
}
