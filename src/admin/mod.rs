//! Admin panel client
//!
//! Typed access to the admin API plus the pager and table rendering the
//! `bongdaha-admin` CLI uses for its list views.

pub mod client;
pub mod pagination;
pub mod table;

pub use client::{AdminClient, AdminError, AdminUser, TokenStore, MIN_PASSWORD_LEN};
pub use pagination::{PageButton, Pagination};
pub use table::{format_date, format_file_size, truncate, Table};
