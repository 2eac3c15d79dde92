//! Server-backed collections and their consistency rules.
//!
//! Each entity gets a synchroniser owning one [`SyncedCollection`]. They
//! share three behaviours, implemented once in the private core:
//!
//! - list reloads are epoch-guarded, so a stale reply never overwrites a
//!   newer one;
//! - mutations apply optimistically, serialise with each other, and roll
//!   back when the server declines; reloads queue behind them, so a list
//!   fetched before a mutation confirmed never clobbers the confirmed
//!   state;
//! - a declined list envelope resolves to an empty collection carrying the
//!   server's message rather than an error.

mod collection;
mod favorites;
mod invoices;
mod missions;
mod notifications;
mod optimistic;
mod payments;
mod poller;
mod profile;
mod support;

pub use collection::SyncedCollection;
pub use favorites::{FavoriteEntry, FavoritesSync};
pub use invoices::{Invoice, InvoicesSync};
pub use missions::{Mission, MissionDeclaration, MissionsSync};
pub use notifications::{NotificationItem, NotificationsSync};
pub use payments::{PaymentsSync, PendingPayment};
pub use poller::{PollerHandle, Sleeper, TokioSleeper, UNREAD_POLL_INTERVAL};
pub use profile::ProfileSync;
pub use support::{NewTicket, SupportSync, SupportTicket};
