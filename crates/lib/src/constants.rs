//! Constants used throughout the plotacl library.
//!
//! This module provides central definitions for the reserved tag names and the
//! key layout used inside the configuration store.

/// Tag granted to every account; describes the streams visible without logging in.
pub const PUBLIC_TAG: &str = "public";

/// Virtual tag granting access to every stream. Never stored.
pub const ALL_TAG: &str = "all";

/// Rendering of the universal-access permission in listings.
pub const ALL_STREAMS_SYMBOL: &str = "<ALL STREAMS>";

/// Key namespace holding account records.
pub const ACCOUNTS_NAMESPACE: &str = "accounts/";

/// Key namespace holding tag definition records.
pub const TAGDEFS_NAMESPACE: &str = "tagdefs/";
