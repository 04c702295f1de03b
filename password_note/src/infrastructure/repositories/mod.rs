// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Local persistence adapters.

pub mod fs_local_store;
pub mod memory;

pub use fs_local_store::FsBlobStore;
pub use memory::{MemoryBlobStore, MemoryRemoteFactory, MemoryRemoteStore};
