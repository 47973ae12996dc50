// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trivial fixed-magic probes (spec.md §4.4, final paragraph): formats identified by a single
//! starts-with (or fixed-offset) byte pattern, with no further structural validation. Driven from
//! one data table per Design Notes §9 rather than one function per format.

use crate::common::{
    Probability, Rank, LIKELY, MAXIMUM, NEARLY_CERTAIN, POSSIBLE, RANK_MARGINAL, RANK_PRIMARY,
    RANK_SECONDARY,
};
use crate::errors::Result;
use crate::kernels::magic_at;
use crate::label::Label;
use crate::registry::Registry;

/// One entry in the fixed-magic table: a name, rank, byte offset, pattern, probability, a
/// zero-argument label constructor (most formats need no attributes), and extension hints.
struct Entry {
    name: &'static str,
    rank: Rank,
    offset: i64,
    pattern: &'static [u8],
    probability: Probability,
    label: fn() -> Label,
    extensions: &'static [&'static str],
}

macro_rules! entry {
    ($name:literal, $rank:expr, $offset:expr, $pattern:expr, $prob:expr, $label:expr, $exts:expr) => {
        Entry {
            name: $name,
            rank: $rank,
            offset: $offset,
            pattern: $pattern,
            probability: $prob,
            label: $label,
            extensions: $exts,
        }
    };
}

fn jpeg_label() -> Label {
    Label::new("image/jpeg")
}
fn png_label() -> Label {
    Label::new("image/png")
}
fn bmp_label() -> Label {
    Label::new("image/bmp")
}
fn tiff_le_label() -> Label {
    Label::new("image/tiff").with("endianness", "LITTLE_ENDIAN")
}
fn tiff_be_label() -> Label {
    Label::new("image/tiff").with("endianness", "BIG_ENDIAN")
}
fn flic_label() -> Label {
    Label::new("video/x-flic")
}
fn shn_label() -> Label {
    Label::new("audio/x-shorten")
}
fn swf_label() -> Label {
    Label::new("application/x-shockwave-flash")
}
fn sds_label() -> Label {
    Label::new("audio/x-sds")
}
fn ircam_label() -> Label {
    Label::new("audio/x-ircam")
}
fn au_label() -> Label {
    Label::new("audio/basic")
}
fn paris_label() -> Label {
    Label::new("audio/x-paris")
}
fn ilbc_label() -> Label {
    Label::new("audio/iLBC")
}
fn tta_label() -> Label {
    Label::new("audio/x-tta")
}
fn ac3_label() -> Label {
    Label::new("audio/x-ac3")
}
fn flv_label() -> Label {
    Label::new("video/x-flv")
}
fn flac_label() -> Label {
    Label::new("audio/x-flac")
}
fn asf_label() -> Label {
    Label::new("video/x-ms-asf")
}
fn realmedia_label() -> Label {
    Label::new("application/vnd.rn-realmedia")
}
fn elf_label() -> Label {
    Label::new("application/x-executable")
}
fn vcd_label() -> Label {
    Label::new("application/x-vcd")
}
fn musepack_sv8_label() -> Label {
    Label::new("audio/x-musepack").with("streamversion", 8i64)
}
fn musepack_sv7_label() -> Label {
    Label::new("audio/x-musepack").with("streamversion", 7i64)
}
fn sid_label() -> Label {
    Label::new("audio/prs.sid")
}
fn xcf_label() -> Label {
    Label::new("image/x-xcf")
}
fn mng_label() -> Label {
    Label::new("video/x-mng")
}
fn jng_label() -> Label {
    Label::new("image/x-jng")
}
fn xpm_label() -> Label {
    Label::new("image/x-xpixmap")
}
fn sun_raster_label() -> Label {
    Label::new("image/x-sun-raster")
}
fn bzip2_label() -> Label {
    Label::new("application/x-bzip")
}
fn gzip_label() -> Label {
    Label::new("application/gzip")
}
fn zip_label() -> Label {
    Label::new("application/zip")
}
fn compress_label() -> Label {
    Label::new("application/x-compress")
}
fn rar_label() -> Label {
    Label::new("application/x-rar")
}
fn dirac_label() -> Label {
    Label::new("video/x-dirac")
}
fn nist_label() -> Label {
    Label::new("audio/x-nist")
}
fn voc_label() -> Label {
    Label::new("audio/x-voc")
}
fn w64_label() -> Label {
    Label::new("audio/x-w64")
}
fn amr_nb_label() -> Label {
    Label::new("audio/AMR")
}
fn amr_wb_label() -> Label {
    Label::new("audio/AMR-WB")
}
fn spc_label() -> Label {
    Label::new("audio/x-spc")
}

const ENTRIES: &[Entry] = &[
    entry!("jpeg", RANK_PRIMARY, 0, &[0xFF, 0xD8, 0xFF], MAXIMUM, jpeg_label, &["jpg", "jpeg"]),
    entry!(
        "png",
        RANK_PRIMARY,
        0,
        &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        MAXIMUM,
        png_label,
        &["png"]
    ),
    // "BM" is a weak, easily-confused two-byte magic; mark it marginal rank and LIKELY only.
    entry!("bmp", RANK_MARGINAL, 0, b"BM", LIKELY, bmp_label, &["bmp"]),
    entry!("tiff-le", RANK_PRIMARY, 0, b"II*\x00", MAXIMUM, tiff_le_label, &["tif", "tiff"]),
    entry!("tiff-be", RANK_PRIMARY, 0, b"MM\x00*", MAXIMUM, tiff_be_label, &["tif", "tiff"]),
    entry!("flic", RANK_SECONDARY, 4, &[0x11, 0xAF], LIKELY, flic_label, &["fli", "flc"]),
    entry!("shn", RANK_PRIMARY, 0, b"ajkg", MAXIMUM, shn_label, &["shn"]),
    entry!("swf-uncompressed", RANK_PRIMARY, 0, b"FWS", MAXIMUM, swf_label, &["swf"]),
    entry!("swf-compressed", RANK_PRIMARY, 0, b"CWS", MAXIMUM, swf_label, &["swf"]),
    entry!("sds", RANK_SECONDARY, 0, &[0xF0, 0x7E], NEARLY_CERTAIN, sds_label, &["sds"]),
    entry!(
        "ircam",
        RANK_SECONDARY,
        0,
        &[0x64, 0xA3, 0x01, 0x00],
        MAXIMUM,
        ircam_label,
        &["sf"]
    ),
    entry!("au", RANK_PRIMARY, 0, b".snd", MAXIMUM, au_label, &["au", "snd"]),
    // Ensoniq PARIS tags the start of its audio files with " paf" (big-endian) or "fap "
    // (little-endian), mirroring the byte-order pair of tags TIFF and WAV64 use.
    entry!("paris-be", RANK_SECONDARY, 0, b" paf", MAXIMUM, paris_label, &["paf"]),
    entry!("paris-le", RANK_SECONDARY, 0, b"fap ", MAXIMUM, paris_label, &["paf"]),
    entry!("ilbc-20", RANK_SECONDARY, 0, b"#!iLBC20\n", MAXIMUM, ilbc_label, &["lbc"]),
    entry!("ilbc-30", RANK_SECONDARY, 0, b"#!iLBC30\n", MAXIMUM, ilbc_label, &["lbc"]),
    entry!("tta", RANK_PRIMARY, 0, b"TTA1", MAXIMUM, tta_label, &["tta"]),
    entry!("ac3", RANK_SECONDARY, 0, &[0x0B, 0x77], POSSIBLE, ac3_label, &["ac3"]),
    entry!("flv", RANK_PRIMARY, 0, b"FLV\x01", MAXIMUM, flv_label, &["flv"]),
    entry!("flac", RANK_PRIMARY, 0, b"fLaC", MAXIMUM, flac_label, &["flac"]),
    entry!(
        "asf",
        RANK_PRIMARY,
        0,
        &[
            0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62,
            0xCE, 0x6C
        ],
        MAXIMUM,
        asf_label,
        &["asf", "wma", "wmv"]
    ),
    entry!("realmedia", RANK_PRIMARY, 0, b".RMF", MAXIMUM, realmedia_label, &["rm", "ra"]),
    entry!("elf", RANK_PRIMARY, 0, &[0x7F, b'E', b'L', b'F'], MAXIMUM, elf_label, &["elf", "so"]),
    entry!("vcd", RANK_MARGINAL, 0, b"ENTRYVCD2000", LIKELY, vcd_label, &["dat"]),
    entry!("musepack-sv8", RANK_PRIMARY, 0, b"MPCK", MAXIMUM, musepack_sv8_label, &["mpc"]),
    entry!("musepack-sv7", RANK_PRIMARY, 0, b"MP+", MAXIMUM, musepack_sv7_label, &["mpc"]),
    entry!("sid-psid", RANK_PRIMARY, 0, b"PSID", MAXIMUM, sid_label, &["sid"]),
    entry!("sid-rsid", RANK_PRIMARY, 0, b"RSID", MAXIMUM, sid_label, &["sid"]),
    entry!(
        "xcf",
        RANK_PRIMARY,
        0,
        b"gimp xcf ",
        MAXIMUM,
        xcf_label,
        &["xcf"]
    ),
    entry!(
        "mng",
        RANK_PRIMARY,
        0,
        &[0x8A, b'M', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        MAXIMUM,
        mng_label,
        &["mng"]
    ),
    entry!(
        "jng",
        RANK_PRIMARY,
        0,
        &[0x8B, b'J', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        MAXIMUM,
        jng_label,
        &["jng"]
    ),
    entry!("xpm", RANK_PRIMARY, 0, b"/* XPM */", MAXIMUM, xpm_label, &["xpm"]),
    entry!(
        "sun-raster",
        RANK_SECONDARY,
        0,
        &[0x59, 0xA6, 0x6A, 0x95],
        MAXIMUM,
        sun_raster_label,
        &["ras"]
    ),
    entry!("bzip2", RANK_PRIMARY, 0, b"BZh", NEARLY_CERTAIN, bzip2_label, &["bz2"]),
    entry!("gzip", RANK_PRIMARY, 0, &[0x1F, 0x8B], NEARLY_CERTAIN, gzip_label, &["gz"]),
    entry!("zip", RANK_PRIMARY, 0, &[b'P', b'K', 0x03, 0x04], NEARLY_CERTAIN, zip_label, &["zip"]),
    entry!(
        "compress",
        RANK_SECONDARY,
        0,
        &[0x1F, 0x9D],
        NEARLY_CERTAIN,
        compress_label,
        &["z"]
    ),
    entry!(
        "rar",
        RANK_PRIMARY,
        0,
        &[b'R', b'a', b'r', b'!', 0x1A, 0x07, 0x00],
        MAXIMUM,
        rar_label,
        &["rar"]
    ),
    entry!("dirac", RANK_PRIMARY, 0, b"BBCD", MAXIMUM, dirac_label, &["drc"]),
    entry!("nist", RANK_PRIMARY, 0, b"NIST_1A", MAXIMUM, nist_label, &["nist", "sph"]),
    entry!(
        "voc",
        RANK_PRIMARY,
        0,
        b"Creative Voice File\x1A",
        MAXIMUM,
        voc_label,
        &["voc"]
    ),
    entry!(
        "w64",
        RANK_PRIMARY,
        0,
        &[
            b'r', b'i', b'f', b'f', 0x2E, 0x91, 0xCF, 0x11, 0xA5, 0xD6, 0x28, 0xDB, 0x04, 0xC1,
            0x00, 0x00
        ],
        MAXIMUM,
        w64_label,
        &["w64"]
    ),
    entry!("amr-nb", RANK_PRIMARY, 0, b"#!AMR\n", MAXIMUM, amr_nb_label, &["amr"]),
    entry!("amr-wb", RANK_PRIMARY, 0, b"#!AMR-WB\n", MAXIMUM, amr_wb_label, &["awb"]),
    entry!(
        "spc",
        RANK_PRIMARY,
        0,
        b"SNES-SPC700 Sound File Data",
        MAXIMUM,
        spc_label,
        &["spc"]
    ),
];

pub fn register_all(registry: &mut Registry) -> Result<()> {
    for e in ENTRIES {
        let pattern = e.pattern;
        let probability = e.probability;
        let label_fn = e.label;
        let offset = e.offset;

        registry.register(
            e.name,
            e.rank,
            e.extensions,
            label_fn(),
            Box::new(move |ctx| {
                magic_at(ctx, offset, pattern, probability, label_fn());
            }),
        )?;
    }
    Ok(())
}
