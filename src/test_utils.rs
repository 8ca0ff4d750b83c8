//! Test utilities
//!
//! Proptest generators and on-disk archive fixtures.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::releases::Asset;

    /// Generate a platform name the host detection can produce
    pub fn host_platform_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("linux_amd64".to_string()),
            Just("linux_i386".to_string()),
            Just("macos".to_string()),
            Just("win64_msvc16".to_string()),
            Just("win32_msvc16".to_string()),
            Just("win64_mingw-w64".to_string()),
            Just("win32_mingw-w64".to_string()),
        ]
    }

    /// Generate a raylib-style version string (`5.0`, `4.5.0`)
    pub fn raylib_version() -> impl Strategy<Value = String> {
        prop_oneof![
            (1u32..10, 0u32..10).prop_map(|(major, minor)| format!("{major}.{minor}")),
            (1u32..10, 0u32..10, 0u32..5)
                .prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}")),
        ]
    }

    /// Build an asset with a dummy download URL
    pub fn asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            browser_download_url: format!("https://example.com/download/{name}"),
            size: 0,
            content_type: None,
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    /// Write a zip archive containing `(name, content)` entries
    pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn append_entries<W: Write>(builder: &mut tar::Builder<W>, entries: &[(&str, &str)]) {
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
    }

    /// Write an uncompressed tar archive
    pub fn write_tar(path: &Path, entries: &[(&str, &str)]) {
        let mut builder = tar::Builder::new(File::create(path).unwrap());
        append_entries(&mut builder, entries);
        builder.finish().unwrap();
    }

    /// Write a tar archive without the builder's entry name validation
    ///
    /// Lets tests produce `../` and absolute entries.
    pub fn write_tar_unchecked(path: &Path, entries: &[(&str, &str)]) {
        let mut builder = tar::Builder::new(File::create(path).unwrap());
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            let raw_name = &mut header.as_gnu_mut().unwrap().name;
            raw_name[..name.len()].copy_from_slice(name.as_bytes());
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, content.as_bytes()).unwrap();
        }
        builder.finish().unwrap();
    }

    /// Write a gzip-compressed tar archive
    pub fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_entries(&mut builder, entries);
        builder.into_inner().unwrap().finish().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_raylib_version_generator(version in raylib_version()) {
            let parts: Vec<&str> = version.split('.').collect();
            prop_assert!(parts.len() == 2 || parts.len() == 3);
            for part in parts {
                prop_assert!(part.parse::<u32>().is_ok());
            }
        }

        #[test]
        fn test_host_platform_name_generator(plat in host_platform_name()) {
            prop_assert!(!plat.is_empty());
            prop_assert!(plat.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }
}
