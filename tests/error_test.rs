use std::io;

use yang::error::YangError;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let yang_err: YangError = io_err.into();

    match yang_err {
        YangError::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = YangError::ParseError {
        path: "build.yang".to_string(),
        line: 4,
        message: "ill-formed download".to_string(),
    };
    assert_eq!(err.to_string(), "Parse error at build.yang:4: ill-formed download.");

    let err = YangError::ExecutionError { command: "cc a.c".to_string(), code: 2 };
    assert_eq!(err.to_string(), "Command 'cc a.c' failed with exit code 2.");
}

#[test]
fn test_exit_codes() {
    let failed = YangError::ExecutionError { command: "x".to_string(), code: 42 };
    assert_eq!(failed.exit_code(), 42);

    assert_eq!(YangError::ManifestNotFound("m".to_string()).exit_code(), 255);
    assert_eq!(
        YangError::TimeoutError { command: "x".to_string(), seconds: 1 }.exit_code(),
        124
    );
    assert_eq!(
        YangError::ExpansionError { template: "$a".to_string(), passes: 64 }.exit_code(),
        1
    );
    assert_eq!(
        YangError::DownloadError { url: "u".to_string(), message: "m".to_string() }.exit_code(),
        1
    );
}
