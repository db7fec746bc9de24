use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub kind: &'static str,
    pub width: f32,
    pub height: f32,
    pub layout: &'a Layout,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout) -> Self {
        let kind = match layout {
            Layout::Radar(_) => "radar",
            Layout::Document(view) if view.is_empty() => "document-empty",
            Layout::Document(_) => "document",
        };
        let (width, height) = layout.size();
        Self {
            kind,
            width,
            height,
            layout,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RadarConfig;
    use crate::ir::RadarEntry;
    use crate::layout::compute_radar_layout;

    #[test]
    fn dump_serializes_radar_geometry() {
        let entries = vec![RadarEntry::new("K8s Security", 85.0, "Infrastructure")];
        let layout = Layout::Radar(compute_radar_layout(&entries, &RadarConfig::default()));
        let value = serde_json::to_value(LayoutDump::from_layout(&layout)).unwrap();
        assert_eq!(value["kind"], "radar");
        assert_eq!(value["width"], 400.0);
        let rings = &value["layout"]["Radar"]["rings"];
        assert_eq!(rings.as_array().map(Vec::len), Some(5));
        assert_eq!(value["layout"]["Radar"]["points"][0]["label_anchor"]["align"], "Middle");
    }
}
