// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::join_all;
use simtemp_core::{Attribute, ConsumerSession, Interrupt, Mode};
use simtemp_test_utils::{state_with, tick_n};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_normal_mode_crosses_threshold_once() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    let interrupt = Interrupt::new();
    session.readiness()?;

    // Act: 100 ticks of +10 land exactly on the threshold.
    tick_n(&state, 100);
    let crossing = session.read_record(&interrupt).await?;

    // Assert
    assert_eq!(crossing.temp_mc, 45_000);
    assert!(crossing.is_alert());
    assert_eq!(crossing.to_string(), "temp=45.0C alert=1");
    assert_eq!(state.stats().alerts, 1);

    tick_n(&state, 10);
    let above = session.read_record(&interrupt).await?;
    assert_eq!(above.temp_mc, 45_100);
    assert_eq!(state.stats().alerts, 1);
    assert_eq!(
        state.show(Attribute::Stats),
        "updates=110\nalerts=1\nlast_error=0\n"
    );
    Ok(())
}

#[test]
fn test_snapshots_pair_sequence_with_its_temperature() {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let done = Arc::new(AtomicBool::new(false));

    let producer = {
        let state = Arc::clone(&state);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for _ in 0..5_000 {
                state.apply_tick();
            }
            done.store(true, Ordering::Release);
        })
    };

    // Act & Assert: temperature at sequence n is fully determined in normal mode.
    let observers: Vec<_> = (0..4)
        .map(|_| {
            let state = Arc::clone(&state);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let snapshot = state.snapshot();
                    let phase = i32::try_from(snapshot.seq % 201).unwrap();
                    assert_eq!(snapshot.temp_mc, 44_000 + 10 * phase);
                }
            })
        })
        .collect();

    producer.join().unwrap();
    for observer in observers {
        observer.join().unwrap();
    }
    assert_eq!(state.stats().updates, 5_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_readers_see_increasing_samples() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 46_000, Mode::Normal);
    let mut sessions: Vec<ConsumerSession> = (0..4).map(|_| state.open_session()).collect();
    for session in &mut sessions {
        session.readiness()?;
    }
    let interrupt = Interrupt::new();

    let producer = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for _ in 0..150 {
                thread::sleep(Duration::from_millis(1));
                state.apply_tick();
            }
        })
    };

    // Act: each reader drains until it sees the final sample.
    let readers = sessions.iter_mut().map(|session| {
        let interrupt = &interrupt;
        async move {
            let mut seen = Vec::new();
            loop {
                let record = session.read_record(interrupt).await?;
                seen.push(record.temp_mc);
                if record.temp_mc == 45_500 {
                    return Ok::<_, simtemp_core::SimtempError>(seen);
                }
            }
        }
    });
    let results = timeout(Duration::from_secs(10), join_all(readers)).await?;
    producer.join().unwrap();

    // Assert
    for seen in results {
        let seen = seen?;
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "{seen:?}");
    }
    assert_eq!(state.stats().alerts, 0);
    Ok(())
}
