// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Persistence ports (async, I/O-bound).

pub mod local_store;
pub mod remote_store;

pub use local_store::{LocalBlobStore, StorageSlot};
pub use remote_store::{RemoteStoreFactory, RemoteVaultStore};
