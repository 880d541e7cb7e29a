//! Piano watch face - nRF52840 firmware entry point.
//!
//! Task layout:
//!
//! ```text
//!   tick_task    ─┐                        ┌─► display (ST7789)
//!   battery_task ─┼─► EVENTS ─► watchface ─┼─► motor_task (Signal)
//!   ble_task     ─┘                        └─► flash_task (Signal)
//! ```
//!
//! `watchface_task` is the only owner of the face state, so every handler
//! runs to completion before the next event is taken.

#![no_std]
#![no_main]

mod battery;
mod ble;
mod display;
mod storage;
mod timekeeping;
mod vibration;

use defmt::{error, info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, interrupt, peripherals, saadc, spim};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use panic_probe as _;
use piano::config::{FACE_ORIGIN, PANEL_SHAPE};
use piano::{Event, GlyphSet, Layout, Settings, WatchFace};
use static_cell::StaticCell;

use crate::battery::Battery;
use crate::ble::Server;
use crate::display::Display;
use crate::storage::FlashSettings;
use crate::timekeeping::QuietHours;
use crate::vibration::MotorVibes;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

const EVENT_QUEUE_LEN: usize = 8;

static EVENTS: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_LEN> = Channel::new();

pub type EventSender = Sender<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_LEN>;
pub type EventReceiver = Receiver<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_LEN>;

static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn watchface_task(
    mut face: WatchFace,
    mut display: Display,
    mut storage: FlashSettings,
    _backlight: Output<'static>,
    events: EventReceiver,
) -> ! {
    let quiet = QuietHours::new();
    let mut glyphs = GlyphSet::new(*face.layout());
    let mut vibes = MotorVibes;

    loop {
        if face.take_redraw() {
            match timekeeping::local_now() {
                Some(now) => {
                    if face.render(now, &quiet, &mut display, &mut glyphs).is_err() {
                        error!("Display write failed");
                    }
                }
                None => warn!("Clock out of range, frame skipped"),
            }
        }

        let event = events.receive().await;
        if let Err(e) = face.handle(&event, &quiet, &mut vibes, &mut storage) {
            error!("Settings save failed: {:?}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Piano watch face starting");

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM3.set_priority(Priority::P3);

    // BLE
    let sd = ble::enable_softdevice();
    let server = SERVER.init(unwrap!(ble::register_server(sd)));
    let sd: &'static _ = sd;
    unwrap!(spawner.spawn(ble::softdevice_task(sd)));

    // Settings
    let mut flash = nrf_softdevice::Flash::take(sd);
    let mut storage = FlashSettings::new(storage::fetch_settings(&mut flash).await);
    let mut settings = Settings::default();
    settings.load(&mut storage);
    info!("Settings: {:?}", settings);
    unwrap!(spawner.spawn(storage::flash_task(flash)));

    // Display
    let mut spim_config = spim::Config::default();
    spim_config.frequency = spim::Frequency::M32;
    spim_config.mode = spim::MODE_3;
    let spim = spim::Spim::new_txonly(p.SPI3, Irqs, p.P0_02, p.P0_03, spim_config);
    let display = unwrap!(display::init(
        spim,
        Output::new(p.P0_25, Level::High, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));
    // Backlight is active-low.
    let backlight = Output::new(p.P0_23, Level::Low, OutputDrive::Standard);

    // Motor, off until a pattern plays.
    let motor = Output::new(p.P0_16, Level::High, OutputDrive::Standard);
    unwrap!(spawner.spawn(vibration::motor_task(motor)));

    // Battery
    let mut saadc_config = saadc::Config::default();
    saadc_config.resolution = saadc::Resolution::_12BIT;
    let channel = saadc::ChannelConfig::single_ended(p.P0_31);
    let adc = saadc::Saadc::new(p.SAADC, Irqs, saadc_config, [channel]);
    adc.calibrate().await;
    let battery = Battery::new(
        adc,
        Input::new(p.P0_12, Pull::None),
        Input::new(p.P0_19, Pull::None),
    );
    unwrap!(spawner.spawn(battery::battery_task(battery, EVENTS.sender())));

    unwrap!(spawner.spawn(timekeeping::tick_task(EVENTS.sender())));
    unwrap!(spawner.spawn(ble::ble_task(sd, server, EVENTS.sender())));

    let mut face = WatchFace::new(settings, Layout::new(PANEL_SHAPE, FACE_ORIGIN));
    face.start(&QuietHours::new());
    unwrap!(spawner.spawn(watchface_task(
        face,
        display,
        storage,
        backlight,
        EVENTS.receiver(),
    )));

    info!("Initialization finished");
}
