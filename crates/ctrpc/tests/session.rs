//! Integration tests for the request/reply pipeline over in-process transports.

use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use ctpack::Cursor;
use ctpack::Encoder;
use ctpack::Schema;
use ctpack::discriminator;
use ctpack::parse_schema;

use ctrpc::Error;
use ctrpc::FnTransport;
use ctrpc::Reply;
use ctrpc::SerializeError;
use ctrpc::Session;
use ctrpc::Transport;
use ctrpc::TransportError;

const SCHEMA: &str = "
    struct Point { int32 x; int32 y; }
    fn sum -> int32 { Point p; }
    fn greet -> string { string name; }
    fn mirror -> Point { Point p; }
";

fn schema() -> Arc<Schema> {
    Arc::new(parse_schema(SCHEMA).expect("schema parses"))
}

fn io(e: impl std::fmt::Display) -> TransportError {
    TransportError::Io(e.to_string())
}

/// A loopback server that answers `sum`, `greet` and `mirror` by reading the raw request.
fn serve(request: &[u8]) -> std::result::Result<Vec<u8>, TransportError> {
    let mut cur = Cursor::new(request);
    let hash = cur.read::<u32>().map_err(io)?;
    let mut reply = Encoder::new();
    if hash == discriminator("sum") {
        let x = cur.read::<i32>().map_err(io)?;
        let y = cur.read::<i32>().map_err(io)?;
        reply.i32(x + y);
    } else if hash == discriminator("greet") {
        let name = cur.read_str().map_err(io)?;
        reply.str(&format!("hello, {}", name)).map_err(io)?;
    } else if hash == discriminator("mirror") {
        let x = cur.read::<i32>().map_err(io)?;
        let y = cur.read::<i32>().map_err(io)?;
        reply.i32(y).i32(x);
    } else {
        return Err(TransportError::Io(format!("unknown discriminator {:#010x}", hash)));
    }
    Ok(reply.into_bytes())
}

// --- Round trips ---

#[tokio::test]
async fn test_execute_sum() -> Result<()> {
    let session = Session::new(schema(), FnTransport::new(serve));
    let reply = session.execute("sum(p={x=1,y=2})").await?;
    assert_eq!(reply, Reply::Int(3));
    assert_eq!(reply.to_string(), "3");
    Ok(())
}

#[tokio::test]
async fn test_execute_string_and_struct_replies() -> Result<()> {
    let session = Session::new(schema(), FnTransport::new(serve));

    let reply = session.execute(r#"greet(name="ada")"#).await?;
    assert_eq!(reply.to_string(), "\"hello, ada\"");

    let reply = session.execute("mirror(p=Point{y=-4, x=9})").await?;
    assert_eq!(reply.to_string(), "Point{x=-4, y=9}");
    Ok(())
}

#[tokio::test]
async fn test_session_over_shared_transport() -> Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let transport: Arc<dyn Transport> = Arc::new(FnTransport::new(move |req: &[u8]| {
        log.lock().unwrap().push(req.to_vec());
        serve(req)
    }));

    let session = Session::new(schema(), transport);
    session.execute("sum(p={x=10,y=20})").await?;
    session.execute("sum(p={y=20,x=10})").await?;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    Ok(())
}

// --- Prepare and complete never touch the transport ---

#[tokio::test]
async fn test_prepare_does_not_send() -> Result<()> {
    let session = Session::new(
        schema(),
        FnTransport::new(|_: &[u8]| -> std::result::Result<Vec<u8>, TransportError> {
            panic!("prepare must not send")
        }),
    );

    let prepared = session.prepare("sum(p={x=1,y=2})")?;
    assert_eq!(prepared.function.name, "sum");
    assert_eq!(&prepared.request[..4], &discriminator("sum").to_be_bytes());
    assert_eq!(&prepared.request[4..], &[0, 0, 0, 1, 0, 0, 0, 2]);

    assert_eq!(
        session.prepare("nope()").unwrap_err(),
        Error::Serialize(SerializeError::UnknownFunction("nope".into()))
    );

    assert_eq!(session.complete("gr"), "greet(name=\"");
    Ok(())
}

// --- Error propagation ---

#[tokio::test]
async fn test_errors_by_stage() {
    let session = Session::new(schema(), FnTransport::new(serve));

    let err = session.execute("sum(p={x=1,y=2}").await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{}", err);

    let err = session.execute("sum(p={x=1})").await.unwrap_err();
    assert!(matches!(err, Error::Serialize(_)), "{}", err);

    let err = session.execute("nope()").await.unwrap_err();
    assert!(matches!(err, Error::Serialize(_)), "{}", err);
}

#[tokio::test]
async fn test_transport_failure() {
    let session = Session::new(
        schema(),
        FnTransport::new(|_: &[u8]| Err(TransportError::Timeout)),
    );
    let err = session.execute("sum(p={x=1,y=2})").await.unwrap_err();
    assert_eq!(err.to_string(), "transport error: no reply before the deadline");
}

#[tokio::test]
async fn test_malformed_reply() {
    let session = Session::new(schema(), FnTransport::new(|_: &[u8]| Ok(vec![0, 0])));
    let err = session.execute("sum(p={x=1,y=2})").await.unwrap_err();
    assert!(matches!(err, Error::Deser(_)), "{}", err);
}
