#![allow(dead_code)]

use std::io::{Cursor, Write};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// In-memory container fixture.
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container with a `bcf.version` declaring `version`.
    pub fn declared(version: &str) -> Self {
        Self::new().entry(
            "bcf.version",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Version VersionId="{version}"><DetailedVersion>{version}</DetailedVersion></Version>"#
            ),
        )
    }

    pub fn entry(mut self, path: impl Into<String>, bytes: impl AsRef<[u8]>) -> Self {
        self.entries.push((path.into(), bytes.as_ref().to_vec()));
        self
    }

    pub fn topic_entry(self, folder: &str, file: &str, bytes: impl AsRef<[u8]>) -> Self {
        self.entry(format!("{folder}/{file}"), bytes)
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (path, bytes) in &self.entries {
            writer.start_file(path.as_str(), options).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

pub fn topic_guid() -> String {
    Uuid::new_v4().to_string()
}

/// `ProjectExtension` project document, with or without a schema reference.
pub fn extension_project(name: &str, with_schema: bool) -> String {
    let schema = if with_schema {
        "<ExtensionSchema>extensions.xsd</ExtensionSchema>"
    } else {
        ""
    };
    format!(
        r#"<ProjectExtension><Project ProjectId="p-legacy"><Name>{name}</Name></Project>{schema}</ProjectExtension>"#
    )
}

/// `ProjectInfo` project document with attribute-only naming.
pub fn project_info(name: &str) -> String {
    format!(r#"<ProjectInfo><Project ProjectId="p-modern" Name="{name}"/></ProjectInfo>"#)
}

/// Flat legacy markup: topic, comments and viewpoint references as siblings.
pub fn legacy_markup(guid: &str, title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Markup>
  <Header><File IfcProject="0J$yPqHBD12v72y4qF6XcD"><Filename>model.ifc</Filename></File></Header>
  <Topic Guid="{guid}" TopicType="Issue" TopicStatus="Open">
    <ReferenceLink>https://example.com/issue</ReferenceLink>
    <Title>{title}</Title>
    <Priority>High</Priority>
    <Labels>Architecture</Labels>
    <CreationDate>2024-03-01T10:00:00Z</CreationDate>
    <CreationAuthor>alice@example.com</CreationAuthor>
  </Topic>
  <Comment Guid="c-1">
    <Date>2024-03-02T10:00:00Z</Date>
    <Author>bob@example.com</Author>
    <Comment>Please check the wall.</Comment>
    <Topic Guid="{guid}"/>
  </Comment>
  <Viewpoints Guid="v-1">
    <Viewpoint>viewpoint.bcfv</Viewpoint>
    <Snapshot>snapshot.png</Snapshot>
  </Viewpoints>
</Markup>"#
    )
}

/// Nested newest-generation markup.
pub fn modern_markup(guid: &str, title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Markup>
  <Topic Guid="{guid}" TopicType="Clash" TopicStatus="Active" ServerAssignedId="ISSUE-7">
    <ReferenceLinks>
      <ReferenceLink>https://example.com/a</ReferenceLink>
      <ReferenceLink>https://example.com/b</ReferenceLink>
    </ReferenceLinks>
    <Title>{title}</Title>
    <Labels><Label>MEP</Label><Label>Level 3</Label></Labels>
    <Comments>
      <Comment Guid="c-1"><Date>2024-05-01T08:00:00Z</Date><Author>carol@example.com</Author><Comment>Moved duct.</Comment></Comment>
    </Comments>
    <Viewpoints>
      <ViewPoint Guid="v-1"><Viewpoint>Viewpoint_v-1.bcfv</Viewpoint><Snapshot>Snapshot_v-1.png</Snapshot></ViewPoint>
    </Viewpoints>
  </Topic>
</Markup>"#
    )
}

/// Perspective camera sub-document.
pub fn perspective_viewpoint(point: (f64, f64, f64), direction: (f64, f64, f64)) -> String {
    format!(
        r#"<VisualizationInfo>
  <PerspectiveCamera>
    <CameraViewPoint><X>{}</X><Y>{}</Y><Z>{}</Z></CameraViewPoint>
    <CameraDirection><X>{}</X><Y>{}</Y><Z>{}</Z></CameraDirection>
    <CameraUpVector><X>0</X><Y>1</Y><Z>0</Z></CameraUpVector>
    <FieldOfView>60</FieldOfView>
  </PerspectiveCamera>
</VisualizationInfo>"#,
        point.0, point.1, point.2, direction.0, direction.1, direction.2
    )
}

/// Smallest valid PNG header; content is never decoded.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n0000";
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0jpeg";
