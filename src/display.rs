//! ST7789 240x240 LCD over SPI.

use display_interface_spi::SPIInterface;
use embassy_nrf::gpio::Output;
use embassy_nrf::peripherals::SPI3;
use embassy_nrf::spim::Spim;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::Builder;
use piano::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use piano::Error;

pub type SpiDevice = ExclusiveDevice<Spim<'static, SPI3>, Output<'static>, Delay>;

/// Concrete display driver.
pub type Display = mipidsi::Display<SPIInterface<SpiDevice, Output<'static>>, ST7789, Output<'static>>;

/// Bring up the panel. The caller owns the backlight.
pub fn init(
    spi: Spim<'static, SPI3>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
) -> Result<Display, Error> {
    let device = ExclusiveDevice::new(spi, cs, Delay).map_err(|_| Error::Display)?;
    let di = SPIInterface::new(device, dc);

    Builder::new(ST7789, di)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut Delay)
        .map_err(|_| Error::Display)
}
