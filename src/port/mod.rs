//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Outbound ports are implemented by adapters for storage and third-party
//! services; inbound ports are what the CLI and request loop drive.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     CLI / serve ──▶│  Resolver, Compatibility│
//!                    │  Filter, Dispatcher     │
//!                    └─────────────────────────┘
//!                      │         │          │
//!                      ▼         ▼          ▼
//!               ┌─────────┐ ┌─────────┐ ┌──────────────┐
//!               │ Vehicle │ │ Product │ │ Registration │
//!               │ Catalog │ │ Catalog │ │    Lookup    │
//!               └─────────┘ └─────────┘ └──────────────┘
//! ```

pub mod inbound;
pub mod outbound;
