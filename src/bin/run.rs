// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal host driver: loads a flat binary image and runs it until the CPU
//! stops or a fatal fault occurs.
//!
//! Usage: `run <image> [load-address] [entry-point]` (addresses in hex,
//! both defaulting to 0x1000). Set `RUST_LOG=trace` to follow the
//! instruction flow.

use std::process::ExitCode;

use log::{error, info};

use m68k_emu::M68k;

fn parse_addr(arg: Option<String>, default: u32) -> Result<u32, String> {
    match arg {
        None => Ok(default),
        Some(s) => {
            let trimmed = s.trim_start_matches("0x").trim_start_matches("0X");
            u32::from_str_radix(trimmed, 16).map_err(|e| format!("bad address {s:?}: {e}"))
        },
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: run <image> [load-address] [entry-point]");
        return ExitCode::FAILURE;
    };

    let image = match std::fs::read(&path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("cannot read {path}: {e}");
            return ExitCode::FAILURE;
        },
    };

    let load_addr = match parse_addr(args.next(), 0x1000) {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };
    let entry = match parse_addr(args.next(), load_addr) {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let mut cpu = match M68k::new() {
        Ok(cpu) => cpu,
        Err(e) => {
            eprintln!("cannot initialise the core: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = cpu.load_program(load_addr, &image, entry) {
        eprintln!("cannot load {path}: {e}");
        return ExitCode::FAILURE;
    }

    info!("loaded {} bytes at {load_addr:#X}, entry {entry:#X}", image.len());

    let mut ticks = 0u64;
    while !cpu.is_stopped() {
        if let Err(e) = cpu.tick() {
            error!("emulator fault after {ticks} instructions: {e}");
            dump(&cpu);
            return ExitCode::FAILURE;
        }
        ticks += 1;
    }

    info!("stopped after {ticks} instructions");
    dump(&cpu);
    ExitCode::SUCCESS
}

fn dump(cpu: &M68k) {
    for reg in 0..8 {
        println!("D{reg} = {:08X}    A{reg} = {:08X}", cpu.d(reg), cpu.a(reg));
    }
    println!("PC = {:08X}    SR = {:04X}", cpu.pc(), cpu.sr());
    println!("USP = {:08X}   SSP = {:08X}", cpu.usp(), cpu.ssp());
}
