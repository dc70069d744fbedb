#![no_std]
#![no_main]

use defmt_rtt as _; // global logger
use panic_probe as _;

mod rtic_main;
