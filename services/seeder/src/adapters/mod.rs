pub mod db;

pub use db::PgContentStore;
