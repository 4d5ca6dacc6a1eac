//! KML document building.

use std::{collections::BTreeMap, fmt::Write as _};

use geo::{LineString, MultiPolygon, Polygon};

/// Shared polygon style: green fill at alpha 100 over a solid green outline.
/// KML colors are `aabbggrr`.
const STYLE_ID: &str = "imaging-area";
const FILL_COLOR: &str = "6400ff00";
const LINE_COLOR: &str = "ff00ff00";

/// Escape text for an XML element body or attribute value.
pub(super) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A KML document assembled in memory.
pub(super) struct KmlDocument {
    buffer: String,
}

impl KmlDocument {
    /// Open a document with the shared polygon style.
    pub(super) fn new(name: &str) -> Self {
        let mut buffer = String::new();
        buffer.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        buffer.push('\n');
        buffer.push_str(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#);
        buffer.push_str("\n<Document>\n");
        let _ = writeln!(buffer, "<name>{}</name>", escape(name));
        let _ = writeln!(buffer,
            "<Style id=\"{STYLE_ID}\"><LineStyle><color>{LINE_COLOR}</color><width>2</width></LineStyle>\
             <PolyStyle><color>{FILL_COLOR}</color></PolyStyle></Style>");
        Self { buffer }
    }

    /// Append a placemark with extended data and one or more polygons.
    pub(super) fn placemark(&mut self, name: &str, data: &BTreeMap<&str, String>, polygons: &[&Polygon<f64>]) {
        let _ = writeln!(self.buffer, "<Placemark>\n<name>{}</name>\n<styleUrl>#{STYLE_ID}</styleUrl>", escape(name));

        if !data.is_empty() {
            self.buffer.push_str("<ExtendedData>\n");
            for (key, value) in data {
                let _ = writeln!(self.buffer, "<Data name=\"{}\"><value>{}</value></Data>", escape(key), escape(value));
            }
            self.buffer.push_str("</ExtendedData>\n");
        }

        match polygons {
            [single] => self.polygon(single),
            many => {
                self.buffer.push_str("<MultiGeometry>\n");
                many.iter().for_each(|polygon| self.polygon(polygon));
                self.buffer.push_str("</MultiGeometry>\n");
            }
        }

        self.buffer.push_str("</Placemark>\n");
    }

    /// Convenience for a MultiPolygon placemark.
    pub(super) fn multipolygon(&mut self, name: &str, data: &BTreeMap<&str, String>, mp: &MultiPolygon<f64>) {
        self.placemark(name, data, &mp.0.iter().collect::<Vec<_>>());
    }

    fn polygon(&mut self, polygon: &Polygon<f64>) {
        self.buffer.push_str("<Polygon>\n<outerBoundaryIs>");
        self.ring(polygon.exterior());
        self.buffer.push_str("</outerBoundaryIs>\n");
        for hole in polygon.interiors() {
            self.buffer.push_str("<innerBoundaryIs>");
            self.ring(hole);
            self.buffer.push_str("</innerBoundaryIs>\n");
        }
        self.buffer.push_str("</Polygon>\n");
    }

    fn ring(&mut self, ring: &LineString<f64>) {
        self.buffer.push_str("<LinearRing><coordinates>");
        for (i, c) in ring.coords().enumerate() {
            if i > 0 { self.buffer.push(' ') }
            let _ = write!(self.buffer, "{},{},0", c.x, c.y);
        }
        self.buffer.push_str("</coordinates></LinearRing>");
    }

    /// Close the document and return its text.
    pub(super) fn finish(mut self) -> String {
        self.buffer.push_str("</Document>\n</kml>\n");
        self.buffer
    }
}
