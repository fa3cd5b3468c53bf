use bytes::Bytes;

use quicstream::for_test::DelegateEvent;
use quicstream::for_test::RecordingDelegate;
use quicstream::Headers;
use quicstream::QuicErrorCode;
use quicstream::SessionConf;
use quicstream::SimpleHttpMessage;
use quicstream::SpdyClientStream;
use quicstream::StreamFrame;

use quicstream_test::*;

fn echo(req: &SimpleHttpMessage) -> quicstream::Result<SimpleHttpMessage> {
    let mut headers = Headers::ok_200();
    headers.add("content-length", req.body.len().to_string());
    headers.add("x-path", req.headers.path().to_owned());
    Ok(SimpleHttpMessage {
        headers,
        body: req.body.clone(),
    })
}

#[test]
fn request_response() {
    init_logger();

    let mut client = client_session();
    let mut server = server_session(SessionConf::new());
    server.serve_spdy(echo);

    let (delegate, log) = RecordingDelegate::new();
    let stream_id = client.open_spdy_client_stream();
    assert_eq!(3, stream_id);
    client.with_stream(stream_id, |stream: &mut SpdyClientStream, session| {
        stream.set_delegate(Box::new(delegate));
        stream.send_request(session, &Headers::new_post("/echo"), &b"hello"[..], true);
    });

    assert_eq!(2, pipe(&mut client, &mut server));
    // Response is sent as soon as the request is complete
    assert_eq!(0, server.num_open_streams());
    assert!(server.is_closed_stream(stream_id));

    let stream: &SpdyClientStream = client.get_stream(stream_id).unwrap();
    assert!(!stream.response_headers_received());

    assert_eq!(2, pipe(&mut server, &mut client));
    assert_eq!(0, client.num_open_streams());
    assert!(client.is_closed_stream(stream_id));

    let mut headers = Headers::ok_200();
    headers.add("content-length", "5");
    headers.add("x-path", "/echo");
    let expected = SimpleHttpMessage {
        headers,
        body: Bytes::from_static(b"hello"),
    };
    assert_eq!(
        vec![
            DelegateEvent::Response(expected),
            DelegateEvent::Close(QuicErrorCode::NoError),
        ],
        log.borrow().events
    );
    assert!(server.connection().rst_streams.is_empty());
    assert!(client.connection().rst_streams.is_empty());
}

#[test]
fn many_requests() {
    init_logger();

    let mut client = client_session();
    let mut server = server_session(SessionConf::new());
    server.serve_spdy(echo);

    let mut logs = Vec::new();
    for i in 0..10 {
        let (delegate, log) = RecordingDelegate::new();
        logs.push(log);
        let stream_id = client.open_spdy_client_stream();
        client.with_stream(stream_id, |stream: &mut SpdyClientStream, session| {
            stream.set_delegate(Box::new(delegate));
            let path = format!("/{}", i);
            stream.send_request(session, &Headers::new_get(path), Bytes::new(), true);
        });
    }
    assert_eq!(10, client.num_open_streams());

    assert_eq!(10, pipe(&mut client, &mut server));
    assert_eq!(0, server.num_open_streams());
    pipe(&mut server, &mut client);
    assert_eq!(0, client.num_open_streams());

    for (i, log) in logs.iter().enumerate() {
        let events = &log.borrow().events;
        assert_eq!(2, events.len());
        match &events[0] {
            DelegateEvent::Response(response) => {
                assert_eq!(200, response.headers.status());
                assert_eq!(format!("/{}", i), response.headers.get("x-path"));
                assert!(response.body.is_empty());
            }
            e => panic!("unexpected event: {:?}", e),
        }
        assert_eq!(DelegateEvent::Close(QuicErrorCode::NoError), events[1]);
    }
}

#[test]
fn headers_decompressed_in_order() {
    init_logger();

    let mut client = client_session();
    let mut server = server_session(SessionConf::new());
    server.serve_spdy(echo);

    let first = client.open_spdy_client_stream();
    let second = client.open_spdy_client_stream();
    for &(id, path) in &[(first, "/first"), (second, "/second")] {
        client.with_stream(id, |stream: &mut SpdyClientStream, session| {
            stream.send_request(session, &Headers::new_get(path), Bytes::new(), true);
        });
    }

    // Header block of the second stream arrives first
    let mut frames = client.connection_mut().take_frames();
    assert_eq!(2, frames.len());
    frames.reverse();

    server.on_stream_frames(&frames[..1]);
    assert_eq!(1, server.num_open_streams());
    assert!(server.connection().written.is_empty());

    server.on_stream_frames(&frames[1..]);
    assert_eq!(0, server.num_open_streams());
    assert_eq!(None, server.connection().connection_close);

    let responses: Vec<StreamFrame> = server.connection_mut().take_frames();
    let ids: Vec<_> = responses.iter().map(|f| f.stream_id).collect();
    assert_eq!(vec![first, second], ids);
}

#[test]
fn frames_after_close_are_ignored() {
    init_logger();

    let mut client = client_session();
    let mut server = server_session(SessionConf::new());
    server.serve_spdy(echo);

    let stream_id = client.open_spdy_client_stream();
    client.with_stream(stream_id, |stream: &mut SpdyClientStream, session| {
        stream.send_request(session, &Headers::new_get("/"), Bytes::new(), true);
    });
    let frames = client.connection_mut().take_frames();
    server.on_stream_frames(&frames);
    assert!(server.is_closed_stream(stream_id));
    server.connection_mut().take_frames();

    // Retransmission
    assert!(server.on_stream_frames(&frames));
    assert_eq!(0, server.num_open_streams());
    assert!(server.connection().written.is_empty());
    assert_eq!(None, server.connection().connection_close);
}
