//! Bluetooth Low Energy link to the companion app.
//!
//! The SoftDevice S140 runs in **Peripheral** role: the watch advertises,
//! the phone connects and writes configuration messages to a single GATT
//! characteristic. Link state changes and decoded messages are forwarded
//! to the watch face as [`Event`]s.

use core::mem;

use defmt::{info, warn};
use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use heapless::Vec;
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};
use piano::config::{BLE_DEVICE_NAME, CONFIG_MESSAGE_MAX_LEN};
use piano::error::BleError;
use piano::{ConfigMessage, Error, Event};

use crate::EventSender;

/// 8a5c0001-2f4e-4b6a-9d1c-6f1e3a2b7c00, little-endian.
const CONFIG_SERVICE_UUID: [u8; 16] = [
    0x00, 0x7c, 0x2b, 0x3a, 0x1e, 0x6f, 0x1c, 0x9d, 0x6a, 0x4b, 0x4e, 0x2f, 0x01, 0x00, 0x5c, 0x8a,
];

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .full_name(BLE_DEVICE_NAME)
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_128(ServiceList::Complete, &[CONFIG_SERVICE_UUID])
    .build();

/// Config writes not yet handed to the face. Writes that arrive while the
/// event queue is busy are merged here instead of being dropped.
static PENDING_CONFIG: Signal<CriticalSectionRawMutex, ConfigMessage> = Signal::new();

fn queue_config(msg: ConfigMessage) {
    let merged = match PENDING_CONFIG.try_take() {
        Some(mut older) => {
            older.merge(msg);
            older
        }
        None => msg,
    };
    PENDING_CONFIG.signal(merged);
}

#[nrf_softdevice::gatt_service(uuid = "8a5c0001-2f4e-4b6a-9d1c-6f1e3a2b7c00")]
pub struct ConfigService {
    /// TLV-encoded settings update.
    #[characteristic(uuid = "8a5c0002-2f4e-4b6a-9d1c-6f1e3a2b7c00", write)]
    pub message: Vec<u8, CONFIG_MESSAGE_MAX_LEN>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub config: ConfigService,
}

/// Bring up the SoftDevice: one peripheral link, no central role.
pub fn enable_softdevice() -> &'static mut Softdevice {
    let config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 128 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: BLE_DEVICE_NAME.as_ptr() as _,
            current_len: BLE_DEVICE_NAME.len() as u16,
            max_len: BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    };

    Softdevice::enable(&config)
}

/// Register the GATT attributes. Must run before the SoftDevice task starts.
pub fn register_server(sd: &mut Softdevice) -> Result<Server, Error> {
    Server::new(sd).map_err(|_| BleError::Register.into())
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

async fn advertise(sd: &'static Softdevice) -> Result<Connection, Error> {
    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &ADV_DATA,
        scan_data: &SCAN_DATA,
    };
    peripheral::advertise_connectable(sd, adv, &peripheral::Config::default())
        .await
        .map_err(|_| BleError::Advertise.into())
}

/// Advertise, serve one connection, repeat.
#[embassy_executor::task]
pub async fn ble_task(sd: &'static Softdevice, server: &'static Server, events: EventSender) -> ! {
    // No link yet; lets the face show the bluetooth glyph from boot.
    events.send(Event::Bluetooth(false)).await;

    loop {
        let conn = match advertise(sd).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Advertising failed: {:?}", e);
                Timer::after_secs(1).await;
                continue;
            }
        };

        info!("Phone connected");
        events.send(Event::Bluetooth(true)).await;

        let serve = gatt_server::run(&conn, server, |e| match e {
            ServerEvent::Config(ConfigServiceEvent::MessageWrite(bytes)) => {
                let msg = ConfigMessage::decode(&bytes);
                if msg.is_empty() {
                    warn!("Config write without known fields ({} bytes)", bytes.len());
                }
                queue_config(msg);
            }
        });
        // Held until the face queue accepts it, so a disconnect mid-send
        // cannot lose it.
        let mut in_flight: Option<ConfigMessage> = None;
        let forward = async {
            loop {
                let msg = PENDING_CONFIG.wait().await;
                in_flight = Some(msg.clone());
                events.send(Event::Config(msg)).await;
                in_flight = None;
            }
        };

        let _ = select(serve, forward).await;
        info!("Phone disconnected");

        // Writes made just before the link dropped still apply.
        let leftover = match (in_flight.take(), PENDING_CONFIG.try_take()) {
            (Some(mut older), Some(newer)) => {
                older.merge(newer);
                Some(older)
            }
            (older, newer) => older.or(newer),
        };
        if let Some(msg) = leftover {
            events.send(Event::Config(msg)).await;
        }
        events.send(Event::Bluetooth(false)).await;
    }
}
