//! Persistent storage for the watch face settings.
//!
//! Uses the nRF52840's internal flash via `sequential-storage`, going
//! through the SoftDevice flash driver so writes do not collide with
//! radio activity.
//!
//! Storage layout:
//!   - One map item under `SETTINGS_KEY` holding the 4-byte settings blob.
//!   - Items are appended sequentially; the flash pages are managed by
//!     `sequential-storage` which handles wear levelling and GC.
//!
//! The watch face saves from inside its event handler, which cannot
//! await. [`FlashSettings`] therefore keeps the current blob in RAM and
//! hands each write to [`flash_task`], the only owner of the flash.

use defmt::{error, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use piano::config::{SETTINGS_KEY, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use piano::settings::{SettingsStorage, SETTINGS_BLOB_LEN};
use piano::Error;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Largest record we read back; anything longer is treated as corrupt.
const MAX_RECORD_SIZE: usize = 32;

/// Latest blob waiting to be written. Newer saves replace older ones.
static PENDING_WRITE: Signal<CriticalSectionRawMutex, [u8; SETTINGS_BLOB_LEN]> = Signal::new();

/// Read the stored settings record, if any.
pub async fn fetch_settings(
    flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
) -> Option<Vec<u8, MAX_RECORD_SIZE>> {
    let flash_range = STORAGE_START..STORAGE_END;
    let mut buf = [0u8; MAX_RECORD_SIZE];

    match sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        flash_range,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &SETTINGS_KEY,
    )
    .await
    {
        Ok(Some(data)) => {
            info!("Loaded {} byte settings record from flash", data.len());
            Vec::from_slice(data).ok()
        }
        Ok(None) => {
            info!("No settings in flash");
            None
        }
        Err(e) => {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            None
        }
    }
}

/// RAM view of the settings record, written back by [`flash_task`].
pub struct FlashSettings {
    record: Option<Vec<u8, MAX_RECORD_SIZE>>,
}

impl FlashSettings {
    pub fn new(record: Option<Vec<u8, MAX_RECORD_SIZE>>) -> Self {
        Self { record }
    }
}

impl SettingsStorage for FlashSettings {
    type Error = Error;

    fn read(&mut self, key: u8, buf: &mut [u8]) -> Result<Option<usize>, Error> {
        if key != SETTINGS_KEY {
            return Ok(None);
        }
        let Some(record) = &self.record else {
            return Ok(None);
        };
        if buf.len() < record.len() {
            return Err(Error::StorageCorrupt);
        }
        buf[..record.len()].copy_from_slice(record);
        Ok(Some(record.len()))
    }

    fn write(&mut self, key: u8, data: &[u8]) -> Result<(), Error> {
        if key != SETTINGS_KEY {
            warn!("No flash slot for key {}", key);
            return Err(Error::Storage);
        }
        let blob: [u8; SETTINGS_BLOB_LEN] = data.try_into().map_err(|_| Error::BufferOverflow)?;
        self.record = Vec::from_slice(data).ok();
        PENDING_WRITE.signal(blob);
        Ok(())
    }
}

/// Persist staged settings to flash, one write per save.
#[embassy_executor::task]
pub async fn flash_task(mut flash: nrf_softdevice::Flash) -> ! {
    loop {
        let blob = PENDING_WRITE.wait().await;

        let flash_range = STORAGE_START..STORAGE_END;
        let mut buf = [0u8; MAX_RECORD_SIZE];
        let item: &[u8] = &blob;

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            &mut flash,
            flash_range,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &SETTINGS_KEY,
            &item,
        )
        .await
        {
            Ok(_) => info!("Saved settings to flash"),
            Err(e) => error!("Flash write error: {:?}", defmt::Debug2Format(&e)),
        }
    }
}
