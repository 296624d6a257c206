//! PPTX package writer.
//!
//! Renders a [`Deck`] into an OOXML presentation package. Parts are generated
//! in memory and compressed into a zip archive; nothing touches the disk until
//! [`Deck::save`].

use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::outline::{Outline, SlideContent};
use super::template::{self, content_type as ct, rel_type};
use crate::{Result, SlidecraftError, APP_NAME};

/// First id in `p:sldIdLst`; lower values are reserved.
const FIRST_SLIDE_ID: u32 = 256;

/// rId1 is the slide master and rId2 the theme; slides follow.
const FIRST_SLIDE_REL: usize = 3;

/// A presentation built in memory and written once.
#[derive(Debug, Clone)]
pub struct Deck {
    title: String,
    slides: Vec<SlideContent>,
    /// Slide width in EMUs (914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    created: DateTime<Utc>,
}

impl Deck {
    /// Create an empty 4:3 deck (10" x 7.5").
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
            slide_width: 9_144_000,
            slide_height: 6_858_000,
            created: Utc::now(),
        }
    }

    /// Create a deck with one slide per outline entry.
    pub fn from_outline(title: impl Into<String>, outline: &Outline) -> Self {
        let mut deck = Self::new(title);
        for slide in &outline.slides {
            deck.add_slide(slide.clone());
        }
        deck
    }

    /// Append a title-and-content slide.
    pub fn add_slide(&mut self, slide: SlideContent) {
        self.slides.push(slide);
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Write the package to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        tracing::info!(
            "Wrote {} slides to {}",
            self.slide_count(),
            path.display()
        );
        Ok(())
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut put = |name: &str, data: &str| -> Result<()> {
            zip.start_file(name, options)?;
            zip.write_all(data.as_bytes())?;
            Ok(())
        };

        put("[Content_Types].xml", &self.content_types_xml()?)?;
        put("_rels/.rels", &package_rels_xml())?;
        put("docProps/core.xml", &self.core_props_xml())?;
        put("docProps/app.xml", &self.app_props_xml())?;
        put("ppt/presentation.xml", &self.presentation_xml()?)?;
        put("ppt/_rels/presentation.xml.rels", &self.presentation_rels_xml()?)?;
        put("ppt/slideMasters/slideMaster1.xml", template::SLIDE_MASTER_XML)?;
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            template::SLIDE_MASTER_RELS,
        )?;
        put("ppt/slideLayouts/slideLayout1.xml", template::SLIDE_LAYOUT_XML)?;
        put(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            template::SLIDE_LAYOUT_RELS,
        )?;
        put("ppt/theme/theme1.xml", template::THEME_XML)?;

        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            put(&format!("ppt/slides/slide{number}.xml"), &slide_xml(slide))?;
            put(
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                template::SLIDE_RELS,
            )?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);
        xml.push_str(template::XML_DECLARATION);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        write!(
            xml,
            r#"<Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/>"#,
            ct::RELATIONSHIPS,
            ct::XML
        )
        .map_err(xml_error)?;

        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), ct::PRESENTATION),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                ct::SLIDE_MASTER,
            ),
            (
                "/ppt/slideLayouts/slideLayout1.xml".to_string(),
                ct::SLIDE_LAYOUT,
            ),
            ("/ppt/theme/theme1.xml".to_string(), ct::THEME),
            ("/docProps/core.xml".to_string(), ct::CORE_PROPERTIES),
            ("/docProps/app.xml".to_string(), ct::EXTENDED_PROPERTIES),
        ];
        for number in 1..=self.slides.len() {
            overrides.push((format!("/ppt/slides/slide{number}.xml"), ct::SLIDE));
        }

        for (part, content_type) in overrides {
            write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            )
            .map_err(xml_error)?;
        }

        xml.push_str("</Types>");
        Ok(xml)
    }

    fn presentation_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024);
        xml.push_str(template::XML_DECLARATION);
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            template::NS_A,
            template::NS_R,
            template::NS_P
        )
        .map_err(xml_error)?;

        xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

        // An empty sldIdLst is not allowed; a deck without slides omits it.
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for index in 0..self.slides.len() {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    FIRST_SLIDE_ID + index as u32,
                    FIRST_SLIDE_REL + index
                )
                .map_err(xml_error)?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/>"#,
            self.slide_width, self.slide_height
        )
        .map_err(xml_error)?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    fn presentation_rels_xml(&self) -> Result<String> {
        let mut rels = vec![
            (
                "rId1".to_string(),
                rel_type::SLIDE_MASTER,
                "slideMasters/slideMaster1.xml".to_string(),
            ),
            (
                "rId2".to_string(),
                rel_type::THEME,
                "theme/theme1.xml".to_string(),
            ),
        ];
        for index in 0..self.slides.len() {
            rels.push((
                format!("rId{}", FIRST_SLIDE_REL + index),
                rel_type::SLIDE,
                format!("slides/slide{}.xml", index + 1),
            ));
        }

        let mut xml = String::with_capacity(512);
        xml.push_str(template::XML_DECLARATION);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, kind, target) in rels {
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id, kind, target
            )
            .map_err(xml_error)?;
        }
        xml.push_str("</Relationships>");
        Ok(xml)
    }

    fn core_props_xml(&self) -> String {
        let stamp = self.created.format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            concat!(
                r#"{decl}<cp:coreProperties "#,
                r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                r#"<dc:title>{title}</dc:title><dc:creator>{app}</dc:creator>"#,
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
                r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
                r#"</cp:coreProperties>"#
            ),
            decl = template::XML_DECLARATION,
            title = escape_xml(&self.title),
            app = APP_NAME,
            stamp = stamp,
        )
    }

    fn app_props_xml(&self) -> String {
        format!(
            concat!(
                r#"{decl}<Properties "#,
                r#"xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
                r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
                r#"<Application>{app}</Application><Slides>{slides}</Slides></Properties>"#
            ),
            decl = template::XML_DECLARATION,
            app = APP_NAME,
            slides = self.slides.len(),
        )
    }
}

fn package_rels_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(template::XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in [
        ("rId1", rel_type::OFFICE_DOCUMENT, "ppt/presentation.xml"),
        ("rId2", rel_type::CORE_PROPERTIES, "docProps/core.xml"),
        ("rId3", rel_type::EXTENDED_PROPERTIES, "docProps/app.xml"),
    ] {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Slide XML with the title placeholder and one body placeholder.
fn slide_xml(slide: &SlideContent) -> String {
    let mut xml = String::with_capacity(1024 + slide.body.len() * 2);
    xml.push_str(template::XML_DECLARATION);
    xml.push_str(&format!(
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        template::NS_A,
        template::NS_R,
        template::NS_P
    ));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(template::SP_TREE_HEADER);

    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>"#);
    xml.push_str("<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>");
    push_paragraph(&mut xml, &slide.title);
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>"#);
    xml.push_str("<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>");
    // One paragraph per line; the text itself is left as written.
    for line in slide.body.split('\n') {
        push_paragraph(&mut xml, line);
    }
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn push_paragraph(xml: &mut String, text: &str) {
    let text = text.trim_end_matches('\r');
    if text.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
        return;
    }
    xml.push_str(r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>"#);
    xml.push_str(&escape_xml(text));
    xml.push_str("</a:t></a:r></a:p>");
}

/// Escape the five XML special characters and drop characters XML 1.0 cannot carry.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

fn xml_error(e: std::fmt::Error) -> SlidecraftError {
    SlidecraftError::Deck(format!("failed to render XML: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    fn sample_deck() -> Deck {
        let mut deck = Deck::new("Climate Change");
        deck.add_slide(SlideContent::new("Overview", "- warming\n- sea level"));
        deck.add_slide(SlideContent::new("Causes & Effects", "CO2 <rising>"));
        deck
    }

    #[test]
    fn escape_handles_specials_and_control_chars() {
        assert_eq!(escape_xml("a & <b> \"c\" 'd'"), "a &amp; &lt;b&gt; &quot;c&quot; &apos;d&apos;");
        assert_eq!(escape_xml("bell\u{7}tab\t"), "belltab\t");
    }

    #[test]
    fn presentation_lists_every_slide() {
        let deck = sample_deck();
        assert_eq!(deck.slide_count(), 2);
        let xml = deck.presentation_xml().unwrap();

        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>"#));
    }

    #[test]
    fn empty_deck_omits_slide_list() {
        let deck = Deck::new("Nothing");
        assert_eq!(deck.slide_count(), 0);
        let xml = deck.presentation_xml().unwrap();
        assert!(!xml.contains("sldIdLst"));

        let bytes = deck.to_bytes().unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.file_names().all(|n| !n.starts_with("ppt/slides/")));
    }

    #[test]
    fn package_contains_required_parts() {
        let bytes = sample_deck().to_bytes().unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&required), "missing part {required}");
        }

        let content_types = read_part(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"PartName="/ppt/slides/slide2.xml""#));
    }

    #[test]
    fn slide_xml_escapes_text_and_splits_body_lines() {
        let bytes = sample_deck().to_bytes().unwrap();

        let first = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(first.contains("<a:t>Overview</a:t>"));
        assert!(first.contains("<a:t>- warming</a:t>"));
        assert!(first.contains("<a:t>- sea level</a:t>"));
        assert!(first.contains(r#"<p:ph idx="1"/>"#));

        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(second.contains("<a:t>Causes &amp; Effects</a:t>"));
        assert!(second.contains("<a:t>CO2 &lt;rising&gt;</a:t>"));
    }

    #[test]
    fn blank_body_line_becomes_empty_paragraph() {
        let xml = slide_xml(&SlideContent::new("T", "a\n\nb"));
        assert!(xml.contains(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#));
    }

    #[test]
    fn core_properties_carry_title() {
        let xml = sample_deck().core_props_xml();
        assert!(xml.contains("<dc:title>Climate Change</dc:title>"));
        assert!(xml.contains("<dc:creator>slidecraft</dc:creator>"));
    }
}
