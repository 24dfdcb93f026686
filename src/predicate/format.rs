//! Textual grammars: digests, timestamps, URLs and identifiers

use std::sync::OnceLock;

use regex::Regex;

use super::time::TimestampFormat;
use crate::error::{Result, ValidationError};

/// Hash digests checked by their hex length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digest {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Shake128,
    Shake256,
    Blake2b,
}

impl Digest {
    /// Number of hex characters in the textual digest
    pub fn hex_len(&self) -> usize {
        match self {
            Digest::Md5 => 32,
            Digest::Sha1 => 40,
            Digest::Sha224 | Digest::Sha3_224 => 56,
            Digest::Sha256 | Digest::Sha3_256 | Digest::Shake128 | Digest::Shake256 => 64,
            Digest::Sha384 | Digest::Sha3_384 => 96,
            Digest::Sha512 | Digest::Sha3_512 | Digest::Blake2b => 128,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Digest::Md5 => "MD5",
            Digest::Sha1 => "SHA-1",
            Digest::Sha224 => "SHA-224",
            Digest::Sha256 => "SHA-256",
            Digest::Sha384 => "SHA-384",
            Digest::Sha512 => "SHA-512",
            Digest::Sha3_224 => "SHA3-224",
            Digest::Sha3_256 => "SHA3-256",
            Digest::Sha3_384 => "SHA3-384",
            Digest::Sha3_512 => "SHA3-512",
            Digest::Shake128 => "SHAKE128",
            Digest::Shake256 => "SHAKE256",
            Digest::Blake2b => "BLAKE2b",
        }
    }
}

/// A named text grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Exactly 32 hex characters
    Hex32,
    Digest(Digest),
    Timestamp(TimestampFormat),
    /// Presigned S3 or minio download URL
    AwsS3Url,
    Domain,
    /// `UPPER_SNAKE_CASE` token with at least one underscore
    KeyValue,
    /// Dotted module path of a rule, e.g. `ccx_rules_ocp.external.rules.nodes_kubelet_version_check`
    RuleFqdn,
    /// Rule module path and error key, e.g. `ccx_rules_ocp.external.rules.check|KEY_ERR`
    RuleId,
    /// Object key of a compressed archive in the Ceph bucket
    CephPath,
    /// Semantic version
    Version,
}

struct Grammars {
    aws_s3_url: Regex,
    domain: Regex,
    key_value: Regex,
    rule_fqdn: Regex,
    rule_id: Regex,
    ceph_path: Regex,
}

// One identifier segment shared by the rule FQDN and rule ID grammars
const SEGMENT: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";

fn grammars() -> &'static Grammars {
    static GRAMMARS: OnceLock<Grammars> = OnceLock::new();
    GRAMMARS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("static grammar must compile");
        Grammars {
            aws_s3_url: compile(concat!(
                r"^(?:https://[^/]+\.s3\.amazonaws\.com/[0-9a-zA-Z/\-]+",
                r"|https://s3\.[0-9a-zA-Z\-]+\.amazonaws\.com/[0-9a-zA-Z\-]+/[0-9a-zA-Z/\-]+",
                r"|http://minio:9000/insights-upload-perma/[0-9a-zA-Z\.\-]+/[0-9a-zA-Z\-]+)",
                r"\?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Credential=[^/]+$",
            )),
            domain: compile(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,10}$"),
            key_value: compile(r"^[A-Z0-9]+(?:_[A-Z0-9]+)+$"),
            rule_fqdn: compile(&format!(r"^{seg}(?:\.{seg})+$", seg = SEGMENT)),
            rule_id: compile(&format!(
                r"^{seg}(?:\.{seg})*\|[A-Z0-9]+(?:_[A-Z0-9]+)*$",
                seg = SEGMENT
            )),
            ceph_path: compile(concat!(
                r"^archives/compressed/[0-9a-fA-F]{2}/",
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}/",
                r"[0-9]{6}/[0-9]{2}/[0-9]+\.tar\.gz$",
            )),
        }
    })
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Hex32 => "hex32",
            Format::Digest(digest) => digest.name(),
            Format::Timestamp(_) => "timestamp",
            Format::AwsS3Url => "AWS S3 URL",
            Format::Domain => "domain",
            Format::KeyValue => "key value",
            Format::RuleFqdn => "rule FQDN",
            Format::RuleId => "rule ID",
            Format::CephPath => "Ceph archive path",
            Format::Version => "version",
        }
    }

    pub fn check(&self, text: &str) -> Result<()> {
        match self {
            Format::Hex32 => check_hex(text, 32, "hex32"),
            Format::Digest(digest) => check_hex(text, digest.hex_len(), digest.name()),
            Format::Timestamp(format) => format.check(text),
            Format::Version => semver::Version::parse(text).map(|_| ()).map_err(|e| {
                ValidationError::format(format!("invalid version {:?}: {}", text, e))
            }),
            Format::AwsS3Url => self.check_grammar(&grammars().aws_s3_url, text),
            Format::Domain => self.check_grammar(&grammars().domain, text),
            Format::KeyValue => self.check_grammar(&grammars().key_value, text),
            Format::RuleFqdn => self.check_grammar(&grammars().rule_fqdn, text),
            Format::RuleId => self.check_grammar(&grammars().rule_id, text),
            Format::CephPath => self.check_grammar(&grammars().ceph_path, text),
        }
    }

    fn check_grammar(&self, grammar: &Regex, text: &str) -> Result<()> {
        if !grammar.is_match(text) {
            return Err(ValidationError::format(format!(
                "wrong {} value {:?}",
                self.name(),
                text
            )));
        }
        Ok(())
    }
}

fn check_hex(text: &str, len: usize, name: &str) -> Result<()> {
    if text.len() != len {
        return Err(ValidationError::format(format!(
            "wrong {} length: {} characters expected, got {}",
            name,
            len,
            text.len()
        )));
    }
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidationError::format(format!(
            "wrong {} value {:?}: hexadecimal digits expected",
            name, text
        )));
    }
    Ok(())
}
