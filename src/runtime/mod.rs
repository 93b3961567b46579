use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::activity::ActivityLog;
use crate::audio::{PlaybackSession, RodioBackend, SessionTiming};
use crate::config::{ReaderBackend, Settings, resolve_config_path};
use crate::controller::SessionController;
use crate::error::{Error, Result};
use crate::library::LibraryIndex;
use crate::tag::{FileTagReader, TagReader, TagSensor};

mod logging;
mod settings;
mod startup;

pub fn run() -> Result<()> {
    logging::init();

    let config_path = resolve_config_path(env::args().nth(1));
    let settings = settings::load_settings(&config_path)?;

    let library = LibraryIndex::build(&settings.usb_mount_path, &settings.library);
    startup::announce_mappings(&settings, &library);

    let recorder = startup::open_activity_log(&settings.activity_log);
    let session = PlaybackSession::new(
        Arc::new(RodioBackend::new(settings.audio_settings.volume)),
        SessionTiming::from(&settings.audio_settings),
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))
            .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
    }

    match settings.reader.backend {
        ReaderBackend::File => {
            let reader = FileTagReader::new(&settings.reader.tag_file);
            info!(path = %reader.path().display(), "reading tags from file");
            let sensor = TagSensor::new(reader);
            drive(sensor, session, library, &settings, recorder, &shutdown)
        }
        #[cfg(feature = "rc522")]
        ReaderBackend::Rc522 => {
            info!(device = %settings.reader.spi_device.display(), "opening mfrc522 reader");
            let reader = crate::tag::Rc522Reader::open(&settings.reader.spi_device)?;
            drive(TagSensor::new(reader), session, library, &settings, recorder, &shutdown)
        }
        #[cfg(not(feature = "rc522"))]
        ReaderBackend::Rc522 => Err(Error::HardwareAcquisition(
            "reader.backend is rc522 but tagplay was built without the rc522 feature".into(),
        )),
    }
}

/// Run the poll loop until interrupted, then stop playback and release the
/// reader. The sensor's drop covers the paths that never reach `shutdown`.
fn drive<R: TagReader>(
    sensor: TagSensor<R>,
    session: PlaybackSession,
    library: LibraryIndex,
    settings: &Settings,
    recorder: ActivityLog,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut controller = SessionController::new(
        sensor,
        session,
        library,
        settings.mappings(),
        recorder,
        settings.reader.poll_interval(),
    );

    info!("monitoring for tags, press Ctrl+C to stop");
    controller.run(shutdown);

    info!("shutting down");
    controller.shutdown();
    Ok(())
}
