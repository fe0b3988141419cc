// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::task::{waker, ArcWake};
use simtemp_core::{
    Interrupt, Mode, Readiness, SampleFlags, SampleRecord, SimtempError, RECORD_SIZE,
};
use simtemp_test_utils::{
    assert_no_sample_within, read_within, state_with, tick_n, FailingSink, TinySink,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::Context;
use std::time::Duration;
use tokio::time::sleep;

struct CountingWaker(AtomicUsize);

impl ArcWake for CountingWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_read_returns_pending_sample_immediately() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    state.apply_tick();

    // Act
    let record = session.read_record(&Interrupt::new()).await?;

    // Assert
    assert_eq!(record.temp_mc, 44_010);
    assert_eq!(record.flags, SampleFlags::NEW_SAMPLE);
    assert_eq!(session.cursor().map(|c| c.last_seen_seq), Some(1));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_blocked_read_wakes_on_tick() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    let interrupt = Interrupt::new();

    // Act
    let (record, ()) = tokio::join!(session.read_record(&interrupt), async {
        sleep(Duration::from_millis(50)).await;
        state.apply_tick();
    });

    // Assert
    assert_eq!(record?.temp_mc, 44_010);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_read_skips_to_latest_after_missed_ticks() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    tick_n(&state, 7);

    let record = session.read_record(&Interrupt::new()).await?;

    assert_eq!(record.temp_mc, 44_070);
    assert_eq!(session.cursor().map(|c| c.last_seen_seq), Some(7));
    assert_no_sample_within(&mut session, 100).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_no_sample_without_tick() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();

    assert_no_sample_within(&mut session, 500).await;

    assert_eq!(session.cursor().map(|c| c.last_seen_seq), Some(0));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_aborts_waiting_read() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    let before = session.cursor();
    let interrupt = Interrupt::new();

    // Act
    let (result, ()) = tokio::join!(session.read_record(&interrupt), async {
        sleep(Duration::from_millis(20)).await;
        interrupt.raise();
    });

    // Assert
    assert_eq!(result, Err(SimtempError::Interrupted));
    assert_eq!(session.cursor(), before);
    assert_eq!(state.stats().last_error, -4);

    // The session is still usable with a fresh interrupt.
    state.apply_tick();
    let record = session.read_record(&Interrupt::new()).await?;
    assert_eq!(record.temp_mc, 44_010);
    Ok(())
}

#[tokio::test]
async fn test_raised_interrupt_does_not_hide_available_sample() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    let interrupt = Interrupt::new();
    interrupt.raise();
    state.apply_tick();

    let record = session.read_record(&interrupt).await?;
    assert_eq!(record.temp_mc, 44_010);

    let second = session.read_record(&interrupt).await;
    assert_eq!(second, Err(SimtempError::Interrupted));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_dropped_read_leaves_cursor_untouched() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    let before = session.cursor();

    // Act: the deadline wins and the read future is dropped.
    let outcome = read_within(&mut session, 50).await;

    // Assert
    assert!(outcome.is_none());
    assert_eq!(session.cursor(), before);

    state.apply_tick();
    let record = read_within(&mut session, 50).await;
    assert_eq!(record.map(|r| r.map(|r| r.temp_mc)), Some(Ok(44_010)));
    Ok(())
}

#[test]
fn test_poll_never_advances_cursor() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_990, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    let before = session.cursor();
    state.apply_tick();

    // Act
    let first = session.readiness()?;
    let second = session.readiness()?;

    // Assert
    let expected = Readiness {
        readable: true,
        priority: true,
    };
    assert_eq!(first, expected);
    assert_eq!(second, expected);
    assert_eq!(expected.bits(), Readiness::READABLE_BIT | Readiness::PRIORITY_BIT);
    assert_eq!(session.cursor(), before);
    assert_eq!(state.stats().alerts, 0);
    Ok(())
}

#[test]
fn test_poll_readiness_registers_for_next_tick() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let waker = waker(Arc::clone(&counter));
    let mut cx = Context::from_waker(&waker);

    let idle = session.poll_readiness(&mut cx)?;
    assert!(!idle.is_ready());
    assert_eq!(idle.bits(), 0);

    // Act
    state.apply_tick();

    // Assert
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    let ready = session.poll_readiness(&mut cx)?;
    assert!(ready.readable);
    assert!(!ready.priority);
    Ok(())
}

#[test]
fn test_priority_follows_threshold_change_without_tick() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;

    state.set_threshold_mc(43_000)?;
    let readiness = session.readiness()?;

    assert!(!readiness.readable);
    assert!(readiness.priority);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_ready_resolves_after_tick() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();

    let (readiness, ()) = tokio::join!(session.ready(), async {
        sleep(Duration::from_millis(10)).await;
        state.apply_tick();
    });

    assert!(readiness?.readable);
    Ok(())
}

#[tokio::test]
async fn test_alerts_count_edges_not_samples() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_990, 45_000, Mode::Normal);
    let mut session = state.open_session();
    let interrupt = Interrupt::new();
    session.readiness()?;

    // Act & Assert: crossing upward.
    state.apply_tick();
    let crossed = session.read_record(&interrupt).await?;
    assert_eq!(crossed.temp_mc, 45_000);
    assert!(crossed.is_alert());
    assert_eq!(state.stats().alerts, 1);

    // Staying above is not a new edge.
    state.apply_tick();
    let still = session.read_record(&interrupt).await?;
    assert!(still.is_alert());
    assert_eq!(state.stats().alerts, 1);

    // Dropping below via a threshold change is.
    state.set_threshold_mc(46_000)?;
    state.apply_tick();
    let cleared = session.read_record(&interrupt).await?;
    assert!(!cleared.is_alert());
    assert_eq!(cleared.flags, SampleFlags::NEW_SAMPLE);
    assert_eq!(state.stats().alerts, 2);
    Ok(())
}

#[tokio::test]
async fn test_alert_uses_threshold_at_read_time() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    state.apply_tick();

    state.set_threshold_mc(44_005)?;
    let record = session.read_record(&Interrupt::new()).await?;

    assert!(record.flags.contains(SampleFlags::THRESHOLD_CROSSED));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_every_session_receives_every_tick() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_990, 45_000, Mode::Normal);
    let mut sessions: Vec<_> = (0..3).map(|_| state.open_session()).collect();
    for session in &mut sessions {
        session.readiness()?;
    }
    let interrupt = Interrupt::new();

    // Act
    let [a, b, c] = sessions.as_mut_slice() else {
        unreachable!("three sessions were opened");
    };
    let (ra, rb, rc, ()) = tokio::join!(
        a.read_record(&interrupt),
        b.read_record(&interrupt),
        c.read_record(&interrupt),
        async {
            sleep(Duration::from_millis(10)).await;
            state.apply_tick();
        }
    );

    // Assert
    for record in [ra?, rb?, rc?] {
        assert_eq!(record.temp_mc, 45_000);
        assert!(record.is_alert());
    }
    assert_eq!(state.stats().alerts, 3);
    assert_eq!(state.stats().updates, 1);
    Ok(())
}

#[tokio::test]
async fn test_undersized_buffer_is_rejected_before_waiting() {
    // Arrange
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    let mut sink = TinySink::default();

    // Act: no tick is pending, so this would block if it waited.
    let result = session.read(&mut sink, &Interrupt::new()).await;

    // Assert
    assert!(matches!(result, Err(SimtempError::InvalidArgument { .. })));
    assert!(!sink.delivered);
    assert!(session.cursor().is_none());
    assert_eq!(state.stats().last_error, -22);
}

#[tokio::test]
async fn test_short_slice_is_rejected() {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    let mut buf = [0u8; 8];

    let result = session.read(&mut buf[..], &Interrupt::new()).await;

    assert!(result.unwrap_err().is_config_rejection());
}

#[tokio::test]
async fn test_failed_delivery_keeps_sample_unread() -> anyhow::Result<()> {
    // Arrange
    let state = state_with(44_990, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    let before = session.cursor();
    state.apply_tick();
    let interrupt = Interrupt::new();
    let mut failing = FailingSink::default();

    // Act
    let result = session.read(&mut failing, &interrupt).await;

    // Assert
    assert!(matches!(result, Err(SimtempError::Fault { .. })));
    assert_eq!(failing.attempts, 1);
    assert_eq!(session.cursor(), before);
    assert_eq!(state.stats().alerts, 0);
    assert_eq!(state.stats().last_error, -14);

    // The same sample is still there for a working buffer.
    let mut out = Vec::new();
    let written = session.read(&mut out, &interrupt).await?;
    assert_eq!(written, RECORD_SIZE);
    let record = SampleRecord::from_bytes(&out)?;
    assert_eq!(record.temp_mc, 45_000);
    assert_eq!(state.stats().alerts, 1);
    Ok(())
}

#[tokio::test]
async fn test_read_into_oversized_slice() -> anyhow::Result<()> {
    let state = state_with(44_000, 45_000, Mode::Normal);
    let mut session = state.open_session();
    session.readiness()?;
    state.apply_tick();
    let mut buf = [0u8; 32];

    let written = session.read(&mut buf[..], &Interrupt::new()).await?;

    assert_eq!(written, RECORD_SIZE);
    let record = SampleRecord::from_bytes(&buf)?;
    assert_eq!(record.temp_mc, 44_010);
    assert_eq!(record.timestamp_ns, state.snapshot().timestamp_ns);
    Ok(())
}
