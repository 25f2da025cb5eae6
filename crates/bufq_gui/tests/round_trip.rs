//! Round-trip and sizing properties of a buffer item carrying a real
//! graphic buffer and fence.

use bufq_flatten::{flatten_to_vec, FdWriter, FlattenError, Flattenable, WriteCursor};
use bufq_gui::{BufferItem, ContentFlags, INVALID_BUFFER_SLOT, NUM_BUFFER_SLOTS};
use bufq_ui::{Dataspace, Fence, GraphicBuffer, NativeHandle, PixelFormat, Rect, ScalingMode, Transform};
use proptest::prelude::*;
use std::fs::File;
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd, RawFd};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn open_fd() -> OwnedFd {
    OwnedFd::from(File::open("/dev/null").unwrap())
}

/// Duplicate sent descriptors the way the kernel would for the receiver
fn receive(raw: &[RawFd]) -> Vec<Option<OwnedFd>> {
    raw.iter()
        .map(|&fd| {
            // SAFETY: the descriptors belong to an item that is still alive
            let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
            Some(borrowed.try_clone_to_owned().unwrap())
        })
        .collect()
}

/// Plain-data fields of an item
#[derive(Debug, Clone)]
struct Plain {
    crop: (i32, i32, i32, i32),
    transform: u32,
    scaling_mode: u32,
    timestamp: i64,
    is_auto_timestamp: bool,
    dataspace: i32,
    frame_number: u64,
    slot: i32,
    is_droppable: bool,
    acquire_called: bool,
    transform_to_display_inverse: bool,
}

/// Shape of the embedded graphic buffer, if any
#[derive(Debug, Clone)]
struct BufferShape {
    width: u32,
    height: u32,
    usage: u64,
    id: u64,
    num_fds: usize,
    ints: Vec<i32>,
}

fn arb_plain() -> impl Strategy<Value = Plain> {
    (
        any::<(i32, i32, i32, i32)>(),
        any::<u32>(),
        0u32..6,
        any::<i64>(),
        any::<bool>(),
        any::<i32>(),
        any::<u64>(),
        INVALID_BUFFER_SLOT..NUM_BUFFER_SLOTS as i32,
        any::<(bool, bool, bool)>(),
    )
        .prop_map(
            |(crop, transform, scaling_mode, timestamp, is_auto_timestamp, dataspace, frame_number, slot, flags)| {
                Plain {
                    crop,
                    transform,
                    scaling_mode,
                    timestamp,
                    is_auto_timestamp,
                    dataspace,
                    frame_number,
                    slot,
                    is_droppable: flags.0,
                    acquire_called: flags.1,
                    transform_to_display_inverse: flags.2,
                }
            },
        )
}

fn arb_buffer() -> impl Strategy<Value = Option<BufferShape>> {
    proptest::option::of(
        (
            1u32..4096,
            1u32..4096,
            any::<u64>(),
            any::<u64>(),
            0usize..3,
            prop::collection::vec(any::<i32>(), 0..8),
        )
            .prop_map(|(width, height, usage, id, num_fds, ints)| BufferShape {
                width,
                height,
                usage,
                id,
                num_fds,
                ints,
            }),
    )
}

fn build(plain: &Plain, buffer: &Option<BufferShape>, with_fence: bool) -> BufferItem {
    let (left, top, right, bottom) = plain.crop;
    BufferItem {
        crop: Rect::new(left, top, right, bottom),
        transform: Transform::from_bits_retain(plain.transform),
        scaling_mode: ScalingMode(plain.scaling_mode),
        timestamp: plain.timestamp,
        is_auto_timestamp: plain.is_auto_timestamp,
        dataspace: Dataspace(plain.dataspace),
        frame_number: plain.frame_number,
        slot: plain.slot,
        is_droppable: plain.is_droppable,
        acquire_called: plain.acquire_called,
        transform_to_display_inverse: plain.transform_to_display_inverse,
        graphic_buffer: buffer.as_ref().map(|shape| {
            let fds = (0..shape.num_fds).map(|_| open_fd()).collect();
            let handle = NativeHandle::new(fds, shape.ints.clone()).unwrap();
            GraphicBuffer {
                usage: shape.usage,
                id: shape.id,
                ..GraphicBuffer::new(shape.width, shape.height, PixelFormat::RGBA_8888, 0)
            }
            .with_handle(handle)
        }),
        fence: with_fence.then(|| Fence::new(open_fd())),
    }
}

fn assert_same(decoded: &BufferItem, item: &BufferItem) {
    assert_eq!(decoded.crop, item.crop);
    assert_eq!(decoded.transform, item.transform);
    assert_eq!(decoded.scaling_mode, item.scaling_mode);
    assert_eq!(decoded.timestamp, item.timestamp);
    assert_eq!(decoded.is_auto_timestamp, item.is_auto_timestamp);
    assert_eq!(decoded.dataspace, item.dataspace);
    assert_eq!(decoded.frame_number, item.frame_number);
    assert_eq!(decoded.slot, item.slot);
    assert_eq!(decoded.is_droppable, item.is_droppable);
    assert_eq!(decoded.acquire_called, item.acquire_called);
    assert_eq!(decoded.transform_to_display_inverse, item.transform_to_display_inverse);
    assert_eq!(decoded.content_flags(), item.content_flags());

    if let (Some(got), Some(want)) = (&decoded.graphic_buffer, &item.graphic_buffer) {
        assert_eq!(got.width, want.width);
        assert_eq!(got.height, want.height);
        assert_eq!(got.usage, want.usage);
        assert_eq!(got.id, want.id);

        let got_handle = got.handle.as_ref();
        let want_handle = want.handle.as_ref();
        assert_eq!(
            got_handle.map(|h| (h.num_fds(), h.ints().to_vec())),
            want_handle
                .filter(|h| h.num_fds() > 0 || h.num_ints() > 0)
                .map(|h| (h.num_fds(), h.ints().to_vec()))
        );
    }
    if let Some(fence) = &decoded.fence {
        assert!(fence.is_valid());
    }
}

proptest! {
    #[test]
    fn round_trip_preserves_item(plain in arb_plain(), buffer in arb_buffer(), with_fence in any::<bool>()) {
        init_tracing();
        let item = build(&plain, &buffer, with_fence);

        let (bytes, raw) = flatten_to_vec(&item).unwrap();
        let mut received = receive(&raw);
        let decoded = BufferItem::decode(&bytes, &mut received).unwrap();

        assert_same(&decoded, &item);
        prop_assert!(received.iter().all(Option::is_none));
    }

    #[test]
    fn encode_consumes_exactly_what_it_reports(
        plain in arb_plain(),
        buffer in arb_buffer(),
        with_fence in any::<bool>(),
        slack in 0usize..16,
    ) {
        let item = build(&plain, &buffer, with_fence);
        let size = item.flattened_size();
        let fd_count = item.fd_count();

        let mut bytes = vec![0u8; size + slack];
        let mut slots: Vec<RawFd> = vec![-1; fd_count + slack];
        let mut cursor = WriteCursor::new(&mut bytes);
        let mut fd_cursor = FdWriter::new(&mut slots);
        item.flatten(&mut cursor, &mut fd_cursor).unwrap();

        prop_assert_eq!(cursor.position(), size);
        prop_assert_eq!(cursor.remaining(), slack);
        prop_assert_eq!(fd_cursor.position(), fd_count);
    }

    #[test]
    fn one_byte_short_always_fails(plain in arb_plain(), buffer in arb_buffer(), with_fence in any::<bool>()) {
        let item = build(&plain, &buffer, with_fence);
        let size = item.flattened_size();

        let mut bytes = vec![0u8; size - 1];
        let mut slots: Vec<RawFd> = vec![-1; item.fd_count()];
        let result = item.flatten(&mut WriteCursor::new(&mut bytes), &mut FdWriter::new(&mut slots));

        prop_assert_eq!(
            result,
            Err(FlattenError::InsufficientSpace { needed: size, available: size - 1 })
        );
    }

    #[test]
    fn every_strict_prefix_is_truncated(buffer in arb_buffer(), with_fence in any::<bool>(), cut in any::<prop::sample::Index>()) {
        let item = build(&Plain {
            crop: (0, 0, 16, 16),
            transform: 0,
            scaling_mode: 0,
            timestamp: 1,
            is_auto_timestamp: false,
            dataspace: 0,
            frame_number: 1,
            slot: 0,
            is_droppable: false,
            acquire_called: false,
            transform_to_display_inverse: false,
        }, &buffer, with_fence);

        let (bytes, raw) = flatten_to_vec(&item).unwrap();
        let len = cut.index(bytes.len());
        let mut received = receive(&raw);

        let err = BufferItem::<GraphicBuffer, Fence>::decode(&bytes[..len], &mut received).unwrap_err();
        prop_assert!(err.is_truncated(), "prefix {} of {}: {:?}", len, bytes.len(), err);
    }
}

#[test]
fn empty_item_scenario() {
    init_tracing();
    let item = BufferItem::<GraphicBuffer, Fence>::new();
    assert!(!item.crop.is_valid());
    assert_eq!(item.transform, Transform::empty());
    assert_eq!(item.scaling_mode, ScalingMode::FREEZE);
    assert_eq!(item.timestamp, 0);
    assert_eq!(item.slot, INVALID_BUFFER_SLOT);
    assert_eq!(item.flattened_size(), 4 + item.pod_size());
    assert_eq!(item.fd_count(), 0);

    let (bytes, raw) = flatten_to_vec(&item).unwrap();
    assert!(raw.is_empty());

    let decoded = BufferItem::<GraphicBuffer, Fence>::decode(&bytes, &mut []).unwrap();
    assert_same(&decoded, &item);
    assert!(decoded.graphic_buffer.is_none());
    assert!(decoded.fence.is_none());
}

#[test]
fn buffer_and_fence_descriptor_order() {
    init_tracing();
    let buffer = GraphicBuffer::new(64, 64, PixelFormat::BGRA_8888, 0)
        .with_handle(NativeHandle::new(vec![open_fd(), open_fd()], vec![42]).unwrap());
    let item = BufferItem {
        graphic_buffer: Some(buffer),
        fence: Some(Fence::new(open_fd())),
        ..BufferItem::new()
    };
    assert_eq!(item.fd_count(), 3);
    // flags + (13 header words + 1 int) + fence word + plain data
    assert_eq!(item.flattened_size(), 4 + 56 + 4 + item.pod_size());

    let (bytes, raw) = flatten_to_vec(&item).unwrap();
    let handle = item.graphic_buffer.as_ref().unwrap().handle.as_ref().unwrap();
    assert_eq!(raw[0], handle.fds()[0].as_raw_fd());
    assert_eq!(raw[1], handle.fds()[1].as_raw_fd());
    assert_eq!(raw[2], item.fence.as_ref().unwrap().as_fd().unwrap().as_raw_fd());

    let flags = u32::from_ne_bytes(bytes[..4].try_into().unwrap());
    assert_eq!(
        ContentFlags::from_bits_truncate(flags),
        ContentFlags::GRAPHIC_BUFFER | ContentFlags::FENCE
    );

    // fence gets the last descriptor even if extras were delivered
    let mut received = receive(&raw);
    received.push(Some(open_fd()));
    let decoded = BufferItem::decode(&bytes, &mut received).unwrap();
    assert_same(&decoded, &item);
    assert!(received[..3].iter().all(Option::is_none));
    assert!(received[3].is_some());
}
