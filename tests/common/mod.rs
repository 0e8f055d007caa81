use std::path::PathBuf;
use std::process::{Command, Output};

pub fn run_opuscaf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_opuscaf"))
        .args(args)
        .output()
        .expect("failed to execute opuscaf binary")
}

pub fn run_opuscaf_in(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_opuscaf"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to execute opuscaf binary")
}

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Build a small, valid Ogg-OPUS byte stream: ID page, comment page, and one
/// audio page carrying `packet_count` CELT 20ms mono packets.
#[allow(dead_code)]
pub fn sample_ogg_opus(packet_count: usize) -> Vec<u8> {
    let toc = (16u8 << 3) | 0b011; // CELT, 20ms
    let mut audio_data = Vec::new();
    let mut packet_sizes = Vec::new();
    for i in 0..packet_count {
        audio_data.push(toc);
        audio_data.push(i as u8);
        audio_data.push((i * 7) as u8);
        packet_sizes.push(3);
    }

    let input = opuscaf::ogg::OggBuildInput {
        channels: 1,
        sample_rate: 48000,
        frame_size: 960,
        packet_sizes: &packet_sizes,
        audio_data: &audio_data,
        serial: 4242,
        vendor: "opuscaf-tests",
        repackage_granule: true,
    };
    opuscaf::ogg::build_ogg_stream(&input).unwrap()
}

/// Build a minimal valid CAF-OPUS byte stream with `packet_count` packets.
#[allow(dead_code)]
pub fn sample_caf_opus(packet_count: usize) -> Vec<u8> {
    let mut audio_data = Vec::new();
    let mut packet_sizes = Vec::new();
    for i in 0..packet_count {
        audio_data.push(i as u8);
        audio_data.push(0xAA);
        packet_sizes.push(2);
    }

    let input = opuscaf::caf::CafBuildInput {
        sample_rate: 48000,
        channels: 1,
        frame_size: 960,
        audio_data: &audio_data,
        packet_sizes: &packet_sizes,
    };
    opuscaf::caf::build_caf_bytes(&input)
}
