//! # PDF Serializer
//!
//! Takes the finished canvas pages and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. We write the raw bytes ourselves
//! because it gives us full control over the output and keeps the crate
//! self-contained. The subset of PDF a résumé needs (text, lines, filled
//! shapes, one or two images, link annotations) is small.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! ## Font Embedding
//!
//! Standard PDF fonts (Helvetica, Times, Courier) use simple Type1 references
//! with WinAnsiEncoding. Custom TrueType fonts are embedded whole as
//! CIDFontType2 with Identity-H encoding, producing 5 PDF objects per font:
//! FontFile2, FontDescriptor, CIDFont, ToUnicode CMap, and the root Type0
//! dictionary.
//!
//! ## Coordinates
//!
//! The canvas is top-down; PDF user space is bottom-up. Every y is flipped
//! here, and nowhere else.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>
use std::sync::Arc;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::canvas::{CanvasPage, DrawCommand};
use crate::error::{Result, VitaeError};
use crate::font::{FontContext, FontData, FontKey};
use crate::image_loader::LoadedImage;
use crate::model::Metadata;
use crate::style::Color;

/// Bezier control point factor for quarter circles.
const KAPPA: f64 = 0.5522847498;

pub struct PdfWriter;

/// Glyph lookup for an embedded TrueType font.
struct CustomFontEmbedData {
    char_to_gid: HashMap<char, u16>,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Resolved font key -> (resource index, object id), in resource order.
    font_objects: Vec<(FontKey, usize)>,
    font_index: HashMap<FontKey, usize>,
    /// Embedding data for custom fonts, keyed by resolved FontKey.
    custom_font_data: HashMap<FontKey, CustomFontEmbedData>,
    /// XObject ids, indexed as /Im0, /Im1, ...
    image_objects: Vec<usize>,
    /// Shared images are written once.
    image_index: HashMap<*const LoadedImage, usize>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(PdfObject { data });
        id
    }

    fn push_stream(&mut self, dict_extra: &str, raw: &[u8]) -> usize {
        let compressed = compress_to_vec_zlib(raw, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {}{} /Filter /FlateDecode >>\nstream\n",
            compressed.len(),
            dict_extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write finished pages to a PDF byte vector.
    pub fn write(&self, pages: &[CanvasPage], metadata: &Metadata, font_context: &FontContext) -> Result<Vec<u8>> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
            font_index: HashMap::new(),
            custom_font_data: HashMap::new(),
            image_objects: Vec::new(),
            image_index: HashMap::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, images, then per page: annotations, content, page
        builder.push(vec![]);
        builder.push(vec![]);
        builder.push(vec![]);

        self.register_fonts(&mut builder, pages, font_context)?;
        self.register_images(&mut builder, pages);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, &builder, font_context);
            let content_obj_id = builder.push_stream("", content.as_bytes());

            let annot_ids: Vec<usize> = page
                .commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Link {
                        x,
                        y,
                        width,
                        height,
                        uri,
                    } => Some(builder.push(Self::link_annotation(page.height, *x, *y, *width, *height, uri))),
                    _ => None,
                })
                .collect();

            let mut resources = format!("/Font << {} >>", self.build_font_resource_dict(&builder));
            let xobjects = self.build_xobject_resource_dict(page, &builder);
            if !xobjects.is_empty() {
                let _ = write!(resources, " /XObject << {} >>", xobjects);
            }
            let annots = if annot_ids.is_empty() {
                String::new()
            } else {
                format!(
                    " /Annots [{}]",
                    annot_ids
                        .iter()
                        .map(|id| format!("{} 0 R", id))
                        .collect::<Vec<_>>()
                        .join(" ")
                )
            };

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >>{} >>",
                page.width, page.height, content_obj_id, resources, annots
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        // Catalog (object 1)
        let mut catalog = String::from("<< /Type /Catalog /Pages 2 0 R");
        if let Some(lang) = metadata.lang.as_deref().filter(|l| !l.is_empty()) {
            let _ = write!(catalog, " /Lang {}", Self::pdf_text_string(lang));
        }
        catalog.push_str(" >>");
        builder.objects[1].data = catalog.into_bytes();

        // Pages tree (object 2)
        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        // Info dictionary (metadata)
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title {} ", Self::pdf_text_string(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author {} ", Self::pdf_text_string(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject {} ", Self::pdf_text_string(subject));
        }
        let _ = write!(
            info,
            "/Producer (Vitae {}) /Creator (Vitae) >>",
            env!("CARGO_PKG_VERSION")
        );
        let info_obj_id = builder.push(info.into_bytes());

        Ok(self.serialize(&builder, info_obj_id))
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &CanvasPage, builder: &PdfBuilder, font_context: &FontContext) -> String {
        let mut stream = String::new();
        let page_height = page.height;

        for command in &page.commands {
            match command {
                DrawCommand::Text {
                    x,
                    baseline,
                    text,
                    style,
                    color,
                } => {
                    let key = font_context.resolve_key(&style.family, style.weight, style.italic);
                    let idx = builder.font_index.get(&key).copied().unwrap_or(0);
                    let _ = write!(
                        stream,
                        "BT\n{} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n",
                        Self::rgb(*color),
                        idx,
                        style.size,
                        x,
                        page_height - baseline
                    );
                    match builder.custom_font_data.get(&key) {
                        Some(embed) => {
                            let _ = writeln!(stream, "<{}> Tj", Self::encode_cid_text(text, &embed.char_to_gid));
                        }
                        None => {
                            let _ = writeln!(stream, "({}) Tj", Self::encode_winansi_text(text));
                        }
                    }
                    stream.push_str("ET\n");
                }

                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    color,
                } => {
                    let _ = write!(
                        stream,
                        "q\n{} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                        Self::rgb(*color),
                        width,
                        x1,
                        page_height - y1,
                        x2,
                        page_height - y2
                    );
                }

                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    radius,
                    fill,
                    stroke,
                } => {
                    let pdf_y = page_height - y - height;
                    let mut path = String::new();
                    if *radius > 0.0 {
                        Self::write_rounded_rect(&mut path, *x, pdf_y, *width, *height, *radius);
                    } else {
                        let _ = writeln!(path, "{:.2} {:.2} {:.2} {:.2} re", x, pdf_y, width, height);
                    }
                    Self::paint_path(&mut stream, &path, *fill, *stroke);
                }

                DrawCommand::Circle {
                    cx,
                    cy,
                    r,
                    fill,
                    stroke,
                } => {
                    let mut path = String::new();
                    Self::write_circle(&mut path, *cx, page_height - cy, *r);
                    Self::paint_path(&mut stream, &path, *fill, *stroke);
                }

                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    image,
                } => {
                    let pdf_y = page_height - y - height;
                    match builder.image_index.get(&Arc::as_ptr(image)) {
                        Some(idx) => {
                            let _ = write!(
                                stream,
                                "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                                width, height, x, pdf_y, idx
                            );
                        }
                        None => {
                            // Grey placeholder if the image was never registered
                            let _ = write!(
                                stream,
                                "q\n0.9 0.9 0.9 rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                                x, pdf_y, width, height
                            );
                        }
                    }
                }

                // Written as annotations, not content.
                DrawCommand::Link { .. } => {}
            }
        }

        stream
    }

    /// Fill and/or stroke a path built in `path`.
    fn paint_path(stream: &mut String, path: &str, fill: Option<Color>, stroke: Option<(Color, f64)>) {
        let fill = fill.filter(|c| c.a > 0.0);
        let stroke = stroke.filter(|(c, w)| c.a > 0.0 && *w > 0.0);
        let op = match (fill, stroke) {
            (Some(_), Some(_)) => "B",
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (None, None) => return,
        };
        stream.push_str("q\n");
        if let Some(c) = fill {
            let _ = writeln!(stream, "{} rg", Self::rgb(c));
        }
        if let Some((c, w)) = stroke {
            let _ = write!(stream, "{} RG\n{:.2} w\n", Self::rgb(c), w);
        }
        stream.push_str(path);
        let _ = write!(stream, "{}\nQ\n", op);
    }

    fn rgb(c: Color) -> String {
        format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
    }

    /// Rectangle path with uniformly rounded corners, in PDF coordinates.
    fn write_rounded_rect(stream: &mut String, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        let r = radius.min(w / 2.0).min(h / 2.0);
        let k = KAPPA;

        let _ = writeln!(stream, "{:.2} {:.2} m", x + r, y);
        let _ = writeln!(stream, "{:.2} {:.2} l", x + w - r, y);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w - r + r * k,
            y,
            x + w,
            y + r - r * k,
            x + w,
            y + r
        );
        let _ = writeln!(stream, "{:.2} {:.2} l", x + w, y + h - r);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w,
            y + h - r + r * k,
            x + w - r + r * k,
            y + h,
            x + w - r,
            y + h
        );
        let _ = writeln!(stream, "{:.2} {:.2} l", x + r, y + h);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + r - r * k,
            y + h,
            x,
            y + h - r + r * k,
            x,
            y + h - r
        );
        let _ = writeln!(stream, "{:.2} {:.2} l", x, y + r);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x,
            y + r - r * k,
            x + r - r * k,
            y,
            x + r,
            y
        );
        stream.push_str("h\n");
    }

    /// Circle path as four Bezier quarter arcs, in PDF coordinates.
    fn write_circle(stream: &mut String, cx: f64, cy: f64, r: f64) {
        let k = r * KAPPA;
        let _ = writeln!(stream, "{:.2} {:.2} m", cx + r, cy);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx + r,
            cy + k,
            cx + k,
            cy + r,
            cx,
            cy + r
        );
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx - k,
            cy + r,
            cx - r,
            cy + k,
            cx - r,
            cy
        );
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx - r,
            cy - k,
            cx - k,
            cy - r,
            cx,
            cy - r
        );
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx + k,
            cy - r,
            cx + r,
            cy - k,
            cx + r,
            cy
        );
        stream.push_str("h\n");
    }

    /// A URI link annotation over a top-down rectangle.
    fn link_annotation(page_height: f64, x: f64, y: f64, width: f64, height: f64, uri: &str) -> Vec<u8> {
        format!(
            "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] /Border [0 0 0] \
             /A << /Type /Action /S /URI /URI ({}) >> >>",
            x,
            page_height - y - height,
            x + width,
            page_height - y,
            Self::escape_pdf_string(uri)
        )
        .into_bytes()
    }

    /// Register fonts used across all pages. Each resolved face gets one
    /// PDF font object, whatever family name the text asked for.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[CanvasPage], font_context: &FontContext) -> Result<()> {
        let mut font_chars: BTreeMap<FontKey, BTreeSet<char>> = BTreeMap::new();
        for page in pages {
            for command in &page.commands {
                if let DrawCommand::Text { text, style, .. } = command {
                    let key = font_context.resolve_key(&style.family, style.weight, style.italic);
                    font_chars.entry(key).or_default().extend(text.chars());
                }
            }
        }

        // Always have at least Helvetica
        if font_chars.is_empty() {
            font_chars.insert(FontKey::new("Helvetica", 400, false), BTreeSet::new());
        }

        for (key, chars) in &font_chars {
            let obj_id = match font_context.resolve(&key.family, key.weight, key.italic) {
                FontData::Standard(std_font) => builder.push(
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    )
                    .into_bytes(),
                ),
                FontData::Custom { data, .. } => Self::write_custom_font_objects(builder, key, data, chars)?,
            };
            builder.font_index.insert(key.clone(), builder.font_objects.len());
            builder.font_objects.push((key.clone(), obj_id));
        }

        Ok(())
    }

    /// Create XObjects for every distinct image on every page.
    fn register_images(&self, builder: &mut PdfBuilder, pages: &[CanvasPage]) {
        for page in pages {
            for command in &page.commands {
                if let DrawCommand::Image { image, .. } = command {
                    let ptr = Arc::as_ptr(image);
                    if builder.image_index.contains_key(&ptr) {
                        continue;
                    }
                    let xobj_id = Self::write_image_xobject(builder, image);
                    builder.image_index.insert(ptr, builder.image_objects.len());
                    builder.image_objects.push(xobj_id);
                }
            }
        }
    }

    /// Write a decoded image as an RGB XObject plus an optional SMask.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        let smask_id = image.alpha.as_ref().map(|alpha| {
            builder.push_stream(
                &format!(
                    " /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceGray /BitsPerComponent 8",
                    image.width_px, image.height_px
                ),
                alpha,
            )
        });

        let smask_ref = smask_id
            .map(|id| format!(" /SMask {} 0 R", id))
            .unwrap_or_default();
        builder.push_stream(
            &format!(
                " /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8{}",
                image.width_px, image.height_px, smask_ref
            ),
            &image.rgb,
        )
    }

    /// The /XObject resource entries for the images on one page.
    fn build_xobject_resource_dict(&self, page: &CanvasPage, builder: &PdfBuilder) -> String {
        let used: BTreeSet<usize> = page
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { image, .. } => builder.image_index.get(&Arc::as_ptr(image)).copied(),
                _ => None,
            })
            .collect();
        used.iter()
            .map(|idx| format!("/Im{} {} 0 R", idx, builder.image_objects[*idx]))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write the 5 CIDFont PDF objects for a custom TrueType font.
    /// Returns the object ID of the Type0 root font dictionary.
    fn write_custom_font_objects(
        builder: &mut PdfBuilder,
        key: &FontKey,
        ttf_data: &[u8],
        used_chars: &BTreeSet<char>,
    ) -> Result<usize> {
        let face = ttf_parser::Face::parse(ttf_data, 0).map_err(|e| {
            VitaeError::Font(format!("Failed to parse TTF data for font '{}': {}", key.family, e))
        })?;

        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();

        let char_to_gid: HashMap<char, u16> = used_chars
            .iter()
            .filter_map(|&ch| face.glyph_index(ch).map(|gid| (ch, gid.0)))
            .collect();

        let pdf_font_name = Self::sanitize_font_name(&key.family, key.weight, key.italic);

        // 1. FontFile2 stream: the whole font, compressed
        let fontfile2_id = builder.push_stream(&format!(" /Length1 {}", ttf_data.len()), ttf_data);

        // 2. FontDescriptor
        let bbox = face.global_bounding_box();
        let scale = 1000.0 / units_per_em as f64;
        let bbox_str = format!(
            "[{} {} {} {}]",
            (bbox.x_min as f64 * scale) as i32,
            (bbox.y_min as f64 * scale) as i32,
            (bbox.x_max as f64 * scale) as i32,
            (bbox.y_max as f64 * scale) as i32,
        );
        let cap_height = face.capital_height().unwrap_or(ascender) as f64 * scale;
        let stem_v = if key.weight >= 700 { 120 } else { 80 };
        let font_descriptor_id = builder.push(
            format!(
                "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
                 /FontBBox {} /ItalicAngle {} \
                 /Ascent {} /Descent {} /CapHeight {} /StemV {} \
                 /FontFile2 {} 0 R >>",
                pdf_font_name,
                bbox_str,
                if key.italic { -12 } else { 0 },
                (ascender as f64 * scale) as i32,
                (descender as f64 * scale) as i32,
                cap_height as i32,
                stem_v,
                fontfile2_id,
            )
            .into_bytes(),
        );

        // 3. CIDFont dictionary (DescendantFont)
        let w_array = Self::build_w_array(&char_to_gid, &face, units_per_em);
        let default_width = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(|adv| (adv as f64 * scale) as u32)
            .unwrap_or(1000);
        let cidfont_id = builder.push(
            format!(
                "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
                 /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
                 /FontDescriptor {} 0 R /DW {} /W {} \
                 /CIDToGIDMap /Identity >>",
                pdf_font_name, font_descriptor_id, default_width, w_array,
            )
            .into_bytes(),
        );

        // 4. ToUnicode CMap
        let cmap = Self::build_tounicode_cmap(&char_to_gid, &pdf_font_name);
        let tounicode_id = builder.push_stream("", cmap.as_bytes());

        // 5. Type0 font dictionary (the root, referenced by /Resources)
        let type0_id = builder.push(
            format!(
                "<< /Type /Font /Subtype /Type0 /BaseFont /{} \
                 /Encoding /Identity-H \
                 /DescendantFonts [{} 0 R] \
                 /ToUnicode {} 0 R >>",
                pdf_font_name, cidfont_id, tounicode_id,
            )
            .into_bytes(),
        );

        builder
            .custom_font_data
            .insert(key.clone(), CustomFontEmbedData { char_to_gid });

        Ok(type0_id)
    }

    /// Build the /W array for per-glyph widths in CIDFont.
    /// Format: [gid [width] gid [width] ...]
    fn build_w_array(char_to_gid: &HashMap<char, u16>, face: &ttf_parser::Face, units_per_em: u16) -> String {
        let scale = 1000.0 / units_per_em as f64;
        let gids: BTreeSet<u16> = char_to_gid.values().copied().collect();

        let mut result = String::from("[");
        for gid in gids {
            let advance = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0);
            let _ = write!(result, " {} [{}]", gid, (advance as f64 * scale) as u32);
        }
        result.push_str(" ]");
        result
    }

    /// Build a ToUnicode CMap for text extraction/copy-paste support.
    fn build_tounicode_cmap(char_to_gid: &HashMap<char, u16>, font_name: &str) -> String {
        // Invert the mapping: gid → unicode codepoint
        let mut gid_to_unicode: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
        gid_to_unicode.sort_unstable();
        gid_to_unicode.dedup_by_key(|(gid, _)| *gid);

        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo\n");
        cmap.push_str("<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        // PDF limits beginbfchar to 100 entries per block
        for chunk in gid_to_unicode.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for &(gid, ch) in chunk {
                let mut utf16 = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, hex);
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");
        cmap
    }

    /// Sanitize a font name for use as a PDF name object.
    /// Strips spaces and special characters, appends weight/style suffixes.
    fn sanitize_font_name(family: &str, weight: u32, italic: bool) -> String {
        let mut name: String = family
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if name.is_empty() {
            name = "CustomFont".to_string();
        }
        if weight >= 700 {
            name.push_str("-Bold");
        }
        if italic {
            name.push_str("-Italic");
        }
        name
    }

    fn build_font_resource_dict(&self, builder: &PdfBuilder) -> String {
        builder
            .font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Glyph ids as 4-digit hex, for Identity-H fonts. Unmapped characters
    /// become glyph 0 (.notdef).
    fn encode_cid_text(text: &str, char_to_gid: &HashMap<char, u16>) -> String {
        let mut hex = String::with_capacity(text.len() * 4);
        for ch in text.chars() {
            let _ = write!(hex, "{:04X}", char_to_gid.get(&ch).copied().unwrap_or(0));
        }
        hex
    }

    /// Body of a literal string for a WinAnsi-encoded standard font.
    fn encode_winansi_text(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    // Octal escape for bytes outside ASCII printable range
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
    }

    /// A PDF text string: a literal for ASCII, UTF-16BE hex with a byte
    /// order mark otherwise.
    fn pdf_text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{:04X}", unit);
        }
        hex.push('>');
        hex
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}
