pub(crate) mod starknet;
