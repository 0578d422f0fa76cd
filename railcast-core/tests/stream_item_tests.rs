// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use railcast_core::{ErrorKind, RailcastError, StreamItem};

#[test]
fn map_and_then_preserve_errors() {
    let value: StreamItem<i32> = StreamItem::Value(2);
    let error: StreamItem<i32> = StreamItem::Error(RailcastError::stream_error("bad"));

    assert_eq!(value.clone().map(|v| v * 10), StreamItem::Value(20));
    assert!(error.clone().map(|v| v * 10).is_error());
    assert!(value
        .and_then(|_| StreamItem::<i32>::Error(RailcastError::cancelled("stop")))
        .is_error());
    assert_eq!(
        error.err().map(|e| e.kind()),
        Some(ErrorKind::Upstream)
    );
}

#[test]
fn converts_from_and_into_result() {
    let ok: StreamItem<&str> = Ok("x").into();
    let failed: StreamItem<&str> = Err(RailcastError::dead_rail(3)).into();
    let back: Result<&str, RailcastError> = failed.into();

    assert_eq!(ok.ok(), Some("x"));
    assert!(matches!(back, Err(RailcastError::DeadRail { rail: 3 })));
}

#[test]
#[should_panic(expected = "called `StreamItem::unwrap()` on an `Error` value")]
fn unwrap_on_error_panics() {
    let item: StreamItem<i32> = StreamItem::Error(RailcastError::stream_error("bad"));
    let _ = item.unwrap();
}
