pub mod saver;
