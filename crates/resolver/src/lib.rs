#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Blinks URL Resolver
//!
//! Maps arbitrary webpage / interstitial URLs to the canonical action API
//! URL behind them, via three branches tried in order:
//!
//! 1. a recognized `solana-action:` scheme prefix, stripped verbatim;
//! 2. an interstitial URL whose `action=` query parameter wraps a prefixed
//!    target ([`interstitial`]);
//! 3. the site's `{origin}/actions.json` glob rule table ([`mapper`]),
//!    fetched and applied first-match-wins.
//!
//! Every failure degrades to `None` rather than an error — a page that
//! doesn't resolve simply doesn't unfurl.

pub mod interstitial;
pub mod mapper;
pub mod unfurl;

pub use interstitial::{InterstitialInfo, SOLANA_ACTION_PREFIX, parse_interstitial};
pub use mapper::{ActionRule, ActionRuleset, map_url};
pub use unfurl::unfurl;
