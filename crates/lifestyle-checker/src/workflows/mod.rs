pub mod lifestyle;
