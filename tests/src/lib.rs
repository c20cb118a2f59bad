//! # Ledger-Lens Test Suite
//!
//! ```text
//! tests/
//! ├── benches/          # Decoder and envelope throughput
//! └── src/integration/  # Cross-subsystem flows over in-memory collaborators
//! ```
//!
//! ```bash
//! cargo test -p ll-tests
//! cargo bench -p ll-tests
//! ```

pub mod integration;
