use clap::Parser;
use embedded_hal::digital::ErrorType;
use embedded_onewire_poll::{
    ClockSource, ONEWIRE_READ_ROM_CMD, OneWireCrc, OneWireDriver, OneWireDriverBuilder,
    OneWireError, OpenDrainPin, Speed,
};
use linux_embedded_hal::{
    CdevPin,
    gpio_cdev::{Chip, LineRequestFlags},
};
use std::time::{Duration, Instant};

/// Read the ROM code of a single 1-Wire device on a GPIO line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the GPIO character device (e.g., /dev/gpiochip0)
    #[arg(short, long, default_value = "/dev/gpiochip0")]
    chip: String,
    /// Offset of the line the 1-Wire bus is attached to
    #[arg(short, long)]
    line: u32,
    /// Use overdrive timings (the device must already be in overdrive)
    #[arg(short, long)]
    overdrive: bool,
    /// Number of reads, 0 to run until interrupted
    #[arg(short = 'n', long, default_value_t = 0)]
    count: u32,
}

/// Nanoseconds since start-up.
struct MonotonicClock(Instant);

impl ClockSource for MonotonicClock {
    fn now(&mut self) -> u64 {
        self.0.elapsed().as_nanos() as u64
    }

    fn tick_hz(&self) -> u32 {
        1_000_000_000
    }
}

type Bus = OneWireDriver<OpenDrainPin<CdevPin>, MonotonicClock>;
type BusError = OneWireError<<CdevPin as ErrorType>::Error>;

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Request the line as an open-drain output, released
    let mut chip = Chip::new(&args.chip).expect("Failed to open GPIO chip");
    let handle = chip
        .get_line(args.line)
        .expect("Failed to get GPIO line")
        .request(
            LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN,
            1,
            "onewire-poll",
        )
        .expect("Failed to request GPIO line");
    let pin = CdevPin::new(handle).expect("Failed to create GPIO pin");
    let speed = if args.overdrive {
        Speed::Overdrive
    } else {
        Speed::Standard
    };
    let mut bus = OneWireDriverBuilder::default()
        .with_speed(speed)
        .build(OpenDrainPin::new(pin), MonotonicClock(Instant::now()))
        .expect("Failed to create 1-Wire driver");
    log::info!("Polling 1-Wire bus on {} line {}", args.chip, args.line);

    let mut reads = 0;
    loop {
        match read_rom(&mut bus) {
            Ok(rom) => log::info!("ROM: {:016x}, family: {:02x}", rom, rom & 0xff),
            Err(OneWireError::NoDevicePresent) => log::warn!("No device present"),
            Err(e) => {
                log::error!("Read ROM failed: {:?}", e);
                bus.recover().expect("Failed to release the 1-Wire line");
            }
        }
        reads += 1;
        if args.count != 0 && reads >= args.count {
            break;
        }
        std::thread::sleep(Duration::from_millis(500));
    }
}

/// Poll the driver until the operation in flight is done.
fn complete(bus: &mut Bus) -> Result<(), BusError> {
    while bus.is_busy() {
        bus.process()?;
    }
    if bus.is_error() {
        return Err(OneWireError::ProtocolFault);
    }
    Ok(())
}

fn reset(bus: &mut Bus) -> Result<(), BusError> {
    bus.begin_reset()?;
    while bus.is_busy() {
        bus.process()?;
    }
    bus.check_presence()
}

fn read_rom(bus: &mut Bus) -> Result<u64, BusError> {
    reset(bus)?;
    bus.write_byte(ONEWIRE_READ_ROM_CMD)?;
    complete(bus)?;
    let mut rom = [0u8; 8];
    for b in rom.iter_mut() {
        bus.begin_read()?;
        complete(bus)?;
        *b = bus.get_byte();
    }
    log::debug!("Raw ROM bytes: {:02x?}", rom);
    OneWireCrc::check(&rom)?;
    Ok(u64::from_le_bytes(rom))
}
