use std::path::Path;

use linux_embedded_hal::SpidevDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use mfrc522::Mfrc522;
use mfrc522::comm::blocking::spi::SpiInterface;
use tracing::{info, warn};

use super::id::TagId;
use super::sensor::{ReadError, TagReader};
use crate::error::{Error, Result};

const SPI_SPEED_HZ: u32 = 1_000_000;

type Scan = Box<dyn FnMut() -> std::result::Result<Option<Vec<u8>>, ReadError> + Send>;

/// MFRC522 reader on a Linux spidev node.
pub struct Rc522Reader {
    scan: Option<Scan>,
}

impl Rc522Reader {
    pub fn open(spi_device: &Path) -> Result<Self> {
        let mut spi = SpidevDevice::open(spi_device).map_err(|e| {
            Error::HardwareAcquisition(format!("{}: {e:?}", spi_device.display()))
        })?;
        let options = SpidevOptions::new()
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)
            .map_err(|e| Error::HardwareAcquisition(format!("configure spi: {e:?}")))?;

        let mut device = Mfrc522::new(SpiInterface::new(spi))
            .init()
            .map_err(|e| Error::HardwareAcquisition(format!("init mfrc522: {e:?}")))?;

        match device.version() {
            Ok(v @ (0x91 | 0x92)) => info!(version = v, "mfrc522 ready"),
            Ok(v) => warn!(version = v, "unexpected mfrc522 version"),
            Err(e) => return Err(Error::HardwareAcquisition(format!("read version: {e:?}"))),
        }

        // WUPA wakes halted cards too, so a tag left on the reader answers again
        // on every poll instead of only the first.
        let scan: Scan = Box::new(move || {
            let atqa = match device.wupa() {
                Ok(atqa) => atqa,
                Err(mfrc522::error::Error::Comm(e)) => return Err(ReadError::Fault(format!("{e:?}"))),
                Err(_) => return Ok(None),
            };
            match device.select(&atqa) {
                Ok(uid) => {
                    let bytes = uid.as_bytes().to_vec();
                    let _ = device.hlta();
                    Ok(Some(bytes))
                }
                Err(mfrc522::error::Error::Comm(e)) => Err(ReadError::Fault(format!("{e:?}"))),
                Err(e) => Err(ReadError::Transient(format!("{e:?}"))),
            }
        });

        Ok(Self { scan: Some(scan) })
    }
}

impl TagReader for Rc522Reader {
    fn read(&mut self) -> std::result::Result<Option<TagId>, ReadError> {
        let Some(scan) = self.scan.as_mut() else {
            return Ok(None);
        };
        Ok(scan()?.map(|uid| TagId::from_uid(&uid)))
    }

    fn release(&mut self) {
        // Dropping the closure drops the device and closes the spidev handle.
        self.scan = None;
    }
}
