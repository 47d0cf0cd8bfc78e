use super::*;
use std::sync::mpsc;

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackState::Playing;
    }
    assert_eq!(iface.playback_status(), "Playing");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackState::Paused;
    }
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_carries_the_title_when_set() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    let map = iface.metadata();
    assert!(map.contains_key("xesam:title"));

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Some Song".to_string());
    }
    let map = iface.metadata();
    let title = map.get("xesam:title").unwrap();
    assert_eq!(String::try_from(title.try_clone().unwrap()).unwrap(), "Some Song");
}

#[test]
fn volume_property_round_trips_through_the_handle() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let mut iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.set_volume(80);
    assert!((iface.volume() - 0.8).abs() < 1e-9);

    // The setter clamps and is forwarded as a command, not applied locally.
    iface.set_volume(0.505);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SetVolume(51));
    iface.set_volume(7.0);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SetVolume(100));

    handle.set_volume(200);
    assert!((iface.volume() - 1.0).abs() < 1e-9);
}

#[test]
fn transport_methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx: tx.clone(),
        state,
    };

    iface.play_pause();
    iface.stop();
    iface.next();
    iface.previous();

    assert_eq!(rx.try_recv().unwrap(), ControlCmd::PlayPause);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Stop);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Next);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Prev);
}

#[test]
fn handle_setters_update_shared_display_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.set_playback(PlaybackState::Playing);
    handle.set_title(Some("Now Playing".to_string()));

    let s = state.lock().unwrap();
    assert_eq!(s.playback, PlaybackState::Playing);
    assert_eq!(s.title.as_deref(), Some("Now Playing"));
}
