// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OGG/Annodex container and codec sub-probes (spec.md §4.4). Page-header field offsets are
//! grounded in `symphonia-format-ogg`'s `page.rs`.

use crate::common::{MAXIMUM, RANK_PRIMARY, RANK_SECONDARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const PAGE_SEGMENTS_OFFSET: i64 = 26;
const FIXED_HEADER_LEN: i64 = 27;

/// The byte offset at which this page's first packet payload begins: the 27-byte fixed header
/// plus its variable-length segment table.
fn payload_offset<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>) -> Option<i64> {
    let segments = ctx.peek(PAGE_SEGMENTS_OFFSET, 1)?[0];
    Some(FIXED_HEADER_LEN + i64::from(segments))
}

fn is_ogg_page<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>) -> bool {
    ctx.peek(0, 4) == Some(b"OggS")
}

fn payload_matches<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>, magic: &[u8]) -> bool {
    if !is_ogg_page(ctx) {
        return false;
    }
    let Some(offset) = payload_offset(ctx)
    else {
        return false;
    };
    ctx.peek(offset, magic.len()) == Some(magic)
}

fn probe_container<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if !is_ogg_page(ctx) {
        return;
    }
    ctx.suggest(MAXIMUM, Label::new("application/ogg"));
    if ctx.peek(28, 8) == Some(b"fishead\0") {
        ctx.suggest(MAXIMUM, Label::new("application/x-annodex"));
    }
}

fn probe_vorbis<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"\x01vorbis") {
        ctx.suggest(MAXIMUM, Label::new("audio/x-vorbis"));
    }
}

fn probe_theora<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"\x80theora") {
        ctx.suggest(MAXIMUM, Label::new("video/x-theora"));
    }
}

fn probe_speex<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"Speex   ") {
        ctx.suggest(MAXIMUM, Label::new("audio/x-speex"));
    }
}

fn probe_ogm_video<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"\x01video") {
        ctx.suggest(MAXIMUM, Label::new("video/x-ogm"));
    }
}

fn probe_ogm_audio<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"\x01audio") {
        ctx.suggest(MAXIMUM, Label::new("audio/x-ogm"));
    }
}

fn probe_ogm_text<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"\x01text") {
        ctx.suggest(MAXIMUM, Label::new("text/x-ogm"));
    }
}

fn probe_skeleton<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"fishead\0") {
        ctx.suggest(MAXIMUM, Label::new("application/x-ogg-skeleton"));
    }
}

fn probe_cmml<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if payload_matches(ctx, b"CMML\0\0\0\0") {
        ctx.suggest(MAXIMUM, Label::new("text/x-cmml"));
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "ogg",
        RANK_PRIMARY,
        &["ogg", "ogx"],
        Label::new("application/ogg"),
        Box::new(|ctx| probe_container(ctx)),
    )?;

    registry.register(
        "ogg-vorbis",
        RANK_SECONDARY,
        &["ogg"],
        Label::new("audio/x-vorbis"),
        Box::new(|ctx| probe_vorbis(ctx)),
    )?;
    registry.register(
        "ogg-theora",
        RANK_SECONDARY,
        &["ogv"],
        Label::new("video/x-theora"),
        Box::new(|ctx| probe_theora(ctx)),
    )?;
    registry.register(
        "ogg-speex",
        RANK_SECONDARY,
        &["spx"],
        Label::new("audio/x-speex"),
        Box::new(|ctx| probe_speex(ctx)),
    )?;
    registry.register(
        "ogg-ogm-video",
        RANK_SECONDARY,
        &["ogm"],
        Label::new("video/x-ogm"),
        Box::new(|ctx| probe_ogm_video(ctx)),
    )?;
    registry.register(
        "ogg-ogm-audio",
        RANK_SECONDARY,
        &["ogm"],
        Label::new("audio/x-ogm"),
        Box::new(|ctx| probe_ogm_audio(ctx)),
    )?;
    registry.register(
        "ogg-ogm-text",
        RANK_SECONDARY,
        &["ogm"],
        Label::new("text/x-ogm"),
        Box::new(|ctx| probe_ogm_text(ctx)),
    )?;
    registry.register(
        "ogg-skeleton",
        RANK_SECONDARY,
        &["ogg"],
        Label::new("application/x-ogg-skeleton"),
        Box::new(|ctx| probe_skeleton(ctx)),
    )?;
    registry.register(
        "ogg-cmml",
        RANK_SECONDARY,
        &["cmml"],
        Label::new("text/x-cmml"),
        Box::new(|ctx| probe_cmml(ctx)),
    )?;

    Ok(())
}
