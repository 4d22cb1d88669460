use crate::layout::{Primitive, Scene};
use crate::render::write_atomic;
use crate::spans::SpanModel;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub max_tracks: usize,
    pub lines: Vec<LineDump>,
    pub bands: Vec<BandDump>,
}

#[derive(Debug, Serialize)]
pub struct LineDump {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub y: f32,
    pub height: f32,
    pub track_count: usize,
    pub segments: Vec<SegmentDump>,
}

#[derive(Debug, Serialize)]
pub struct SegmentDump {
    pub annotation: usize,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub track: usize,
    pub multiline: bool,
    pub continues_from_above: bool,
    pub continues_below: bool,
}

#[derive(Debug, Serialize)]
pub struct BandDump {
    pub annotation: Option<usize>,
    pub label: String,
    pub color: String,
    pub track: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutDump {
    pub fn from_scene(scene: &Scene, model: &SpanModel) -> Self {
        let lines = model
            .lines
            .iter()
            .zip(&scene.rows)
            .zip(&scene.tracks.lines)
            .map(|((line, row), tracks)| LineDump {
                index: line.index,
                start: line.start,
                end: line.end,
                text: line.text.clone(),
                y: row.y,
                height: row.height,
                track_count: tracks.track_count,
                segments: tracks
                    .segments
                    .iter()
                    .map(|segment| {
                        let span = &model.spans[segment.span];
                        SegmentDump {
                            annotation: span.index,
                            label: span.label.clone(),
                            start: segment.start,
                            end: segment.end,
                            track: segment.track,
                            multiline: span.multiline,
                            continues_from_above: segment.continues_from_above,
                            continues_below: segment.continues_below,
                        }
                    })
                    .collect(),
            })
            .collect();

        let bands = scene
            .primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Band(band) => Some(BandDump {
                    annotation: band.span.map(|idx| model.spans[idx].index),
                    label: band.label.clone(),
                    color: band.color.clone(),
                    track: band.track,
                    x: band.x,
                    y: band.y,
                    width: band.width,
                    height: band.height,
                }),
                _ => None,
            })
            .collect();

        LayoutDump {
            width: scene.width,
            height: scene.height,
            max_tracks: scene.tracks.max_tracks(),
            lines,
            bands,
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &Scene, model: &SpanModel) -> anyhow::Result<()> {
    let dump = LayoutDump::from_scene(scene, model);
    let bytes = serde_json::to_vec_pretty(&dump)?;
    write_atomic(path, &bytes)?;
    Ok(())
}
