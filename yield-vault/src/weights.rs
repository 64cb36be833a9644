// Copyright 2021-2022 Zenlink.
// Licensed under Apache 2.0.

use frame_support::weights::{constants::RocksDbWeight, Weight};

pub trait WeightInfo {
	fn create_vault() -> Weight;
	fn deposit() -> Weight;
	fn deposit_all() -> Weight;
	fn withdraw() -> Weight;
	fn withdraw_all() -> Weight;
	fn earn() -> Weight;
	fn tend() -> Weight;
	fn harvest() -> Weight;
	fn report_additional_token() -> Weight;
	fn withdraw_to_vault() -> Weight;
	fn sweep_extra_token() -> Weight;
	fn add_protected_tokens() -> Weight;
	fn update_config() -> Weight;
}

impl WeightInfo for () {
	fn create_vault() -> Weight {
		Weight::from_parts(40_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn deposit() -> Weight {
		Weight::from_parts(60_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(4))
			.saturating_add(RocksDbWeight::get().writes(3))
	}
	fn deposit_all() -> Weight {
		Self::deposit()
	}
	fn withdraw() -> Weight {
		Weight::from_parts(80_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(5))
			.saturating_add(RocksDbWeight::get().writes(4))
	}
	fn withdraw_all() -> Weight {
		Self::withdraw()
	}
	fn earn() -> Weight {
		Weight::from_parts(50_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn tend() -> Weight {
		Weight::from_parts(20_000_000, 0).saturating_add(RocksDbWeight::get().reads(1))
	}
	fn harvest() -> Weight {
		Weight::from_parts(90_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(5))
			.saturating_add(RocksDbWeight::get().writes(4))
	}
	fn report_additional_token() -> Weight {
		Weight::from_parts(70_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(4))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn withdraw_to_vault() -> Weight {
		Weight::from_parts(50_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn sweep_extra_token() -> Weight {
		Weight::from_parts(50_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn add_protected_tokens() -> Weight {
		Weight::from_parts(30_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn update_config() -> Weight {
		Weight::from_parts(25_000_000, 0)
			.saturating_add(RocksDbWeight::get().reads(1))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
}
