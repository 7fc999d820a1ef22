//! Active tooling: nmap and the EyeWitness fingerprinting tool.

use std::path::Path;

use crate::process::CommandSpec;

/// Default scripts plus service/version detection, XML report.
pub fn nmap_spec(scanner: &str, address_list: &Path, report: &Path) -> CommandSpec {
    CommandSpec::new(scanner)
        .args(["-sC", "-sV", "-oX"])
        .arg(report.display().to_string())
        .arg("-iL")
        .arg(address_list.display().to_string())
}

/// Web screenshots for every address, trying HTTPS first.
pub fn fingerprint_spec(
    fingerprinter: &str,
    address_list: &Path,
    directory: &Path,
) -> CommandSpec {
    CommandSpec::new(fingerprinter)
        .args(["--web", "-f"])
        .arg(address_list.display().to_string())
        .args(["--resolve", "--prepend-https", "-d"])
        .arg(directory.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmap_reads_list_and_writes_xml() {
        let spec = nmap_spec(
            "nmap",
            Path::new("/tmp/r/address-list.txt"),
            Path::new("/tmp/r/scan-report.xml"),
        );
        assert_eq!(
            spec.args,
            [
                "-sC",
                "-sV",
                "-oX",
                "/tmp/r/scan-report.xml",
                "-iL",
                "/tmp/r/address-list.txt"
            ]
        );
    }

    #[test]
    fn fingerprint_uses_https_first() {
        let spec = fingerprint_spec(
            "eyewitness",
            Path::new("list.txt"),
            Path::new("out/fingerprints"),
        );
        assert_eq!(spec.program, "eyewitness");
        assert_eq!(
            spec.args,
            [
                "--web",
                "-f",
                "list.txt",
                "--resolve",
                "--prepend-https",
                "-d",
                "out/fingerprints"
            ]
        );
    }
}
