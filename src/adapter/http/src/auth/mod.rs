// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod me_handler;
mod nonce_handler;
mod router;
mod verify_handler;

pub use me_handler::*;
pub use nonce_handler::*;
pub use router::*;
pub use verify_handler::*;
