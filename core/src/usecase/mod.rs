pub mod organise;
