// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Wire-level behaviour of both encodings.

use prost::Message;

use topology_api::codec::{self, json, proto, protobuf, Encoding};
use topology_api::v1alpha1::{
    AttributeInfo, CostInfo, NodeResourceTopology, NodeResourceTopologyList, ResourceInfo, Zone,
    ZoneType,
};
use topology_api::{DecodeError, Quantity};

fn node_1() -> NodeResourceTopology {
    NodeResourceTopology::new(
        "node-1",
        vec![
            Zone::new("node0", ZoneType::NODE)
                .with_resource(ResourceInfo::parse("cpu", "4", "4", "2").unwrap()),
            Zone::new("core0", ZoneType::CORE)
                .with_parent("node0")
                .with_cost("node0", 10),
        ],
    )
}

fn q(s: &str) -> Quantity {
    s.parse().unwrap()
}

#[test]
fn node_1_round_trips_through_json() {
    let original = node_1();
    let text = json::to_string(&original).unwrap();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["apiVersion"], "topology.node.k8s.io/v1alpha1");
    assert_eq!(value["kind"], "NodeResourceTopology");
    assert_eq!(value["zones"][0]["type"], "Node");
    assert!(value["zones"][0].get("parent").is_none());
    assert_eq!(value["zones"][0]["resources"][0]["capacity"], "4");
    assert_eq!(value["zones"][1]["parent"], "node0");
    assert_eq!(value["zones"][1]["costs"][0]["value"], 10);
    assert!(value.get("attributes").is_none());

    let decoded: NodeResourceTopology = json::from_str(&text).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(decoded.zones[0].name, "node0");
    assert_eq!(decoded.zones[1].name, "core0");
    assert!(decoded.zones[0].is_root());
    assert_eq!(decoded.zones[1].costs, vec![CostInfo::new("node0", 10)]);
}

#[test]
fn node_1_round_trips_through_protobuf() {
    let original = node_1();

    let bare: NodeResourceTopology =
        protobuf::decode(protobuf::encode(&original).as_slice()).unwrap();
    assert_eq!(bare, original);

    let wrapped = protobuf::encode_envelope(&original);
    assert_eq!(&wrapped[..4], &protobuf::MAGIC);
    let decoded: NodeResourceTopology = protobuf::decode_envelope(&wrapped).unwrap();
    assert_eq!(decoded, original);

    let resource = &decoded.zones[0].resources[0];
    assert_eq!(resource.capacity, q("4"));
    assert_eq!(resource.available, q("2"));
}

#[test]
fn binary_tags_are_fixed() {
    let zone = Zone::new("core0", ZoneType::CORE)
        .with_parent("node0")
        .with_cost("node0", 10)
        .with_attribute("k", "v")
        .with_resource(ResourceInfo::parse("cpu", "1", "1", "1").unwrap());

    let message = proto::Zone::decode(protobuf::encode(&zone).as_slice()).unwrap();
    assert_eq!(message.name.as_deref(), Some("core0"));
    assert_eq!(message.r#type.as_deref(), Some("Core"));
    assert_eq!(message.parent.as_deref(), Some("node0"));

    let bytes = protobuf::encode(&zone);
    // field 1, wire type 2 (length delimited)
    assert_eq!(bytes[0], 0x0a);
    assert_eq!(&bytes[2..7], b"core0");
    // field 2, wire type 2
    assert_eq!(bytes[7], 0x12);

    let cost = protobuf::encode(&CostInfo::new("n", 10));
    // name: tag 1 / len 1 / 'n', value: tag 2 varint 10
    assert_eq!(cost, vec![0x0a, 0x01, b'n', 0x10, 0x0a]);
}

#[test]
fn omitted_optional_fields_decode_empty() {
    let zone: Zone = json::from_str(r#"{"name":"node0","type":"Node"}"#).unwrap();
    assert_eq!(zone.parent, "");
    assert!(zone.costs.is_empty());
    assert!(zone.attributes.is_empty());
    assert!(zone.resources.is_empty());

    let zone: Zone = json::from_str(
        r#"{"name":"node0","type":"Node","costs":null,"attributes":null,"resources":null}"#,
    )
    .unwrap();
    assert!(zone.costs.is_empty());

    let obj: NodeResourceTopology = json::from_str(
        r#"{"apiVersion":"topology.node.k8s.io/v1alpha1","kind":"NodeResourceTopology","metadata":{"name":"n"},"zones":null}"#,
    )
    .unwrap();
    assert!(obj.zones.is_empty());
    assert!(obj.attributes.is_empty());

    let message = proto::Zone {
        name: Some("node0".to_string()),
        r#type: Some("Node".to_string()),
        ..Default::default()
    };
    let zone: Zone = protobuf::decode(message.encode_to_vec().as_slice()).unwrap();
    assert_eq!(zone, Zone::new("node0", ZoneType::NODE));
}

#[test]
fn unknown_fields_are_ignored() {
    let zone = Zone::new("node0", ZoneType::NODE).with_cost("node0", 10);
    let mut bytes = protobuf::encode(&zone);
    // field 99 varint 1, field 100 length-delimited "x"
    bytes.extend_from_slice(&[0x98, 0x06, 0x01, 0xa2, 0x06, 0x01, b'x']);
    let decoded: Zone = protobuf::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded, zone);

    let obj: NodeResourceTopology = json::from_str(
        r#"{"kind":"NodeResourceTopology","zones":[{"name":"a","type":"Die","future":{"x":1}}],"topologyPolicies":["None"]}"#,
    )
    .unwrap();
    assert_eq!(obj.zones[0].zone_type, "Die");
}

#[test]
fn missing_required_binary_fields_fail() {
    let message = proto::Zone {
        name: Some("node0".to_string()),
        ..Default::default()
    };
    let err = protobuf::decode::<Zone>(message.encode_to_vec().as_slice()).unwrap_err();
    assert!(
        matches!(err, DecodeError::MissingField { field: "type", .. }),
        "{err}"
    );

    let message = proto::ResourceInfo {
        name: Some("cpu".to_string()),
        capacity: Some(proto::Quantity {
            string: Some("4".to_string()),
        }),
        allocatable: Some(proto::Quantity {
            string: Some("4".to_string()),
        }),
        available: None,
    };
    let err = protobuf::decode::<ResourceInfo>(message.encode_to_vec().as_slice()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::MissingField {
            field: "available",
            ..
        }
    ));

    let err = protobuf::decode::<CostInfo>(
        proto::CostInfo {
            name: Some("n".to_string()),
            value: None,
        }
        .encode_to_vec()
        .as_slice(),
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::MissingField { field: "value", .. }));
}

#[test]
fn bad_quantities_fail_to_decode() {
    let message = proto::ResourceInfo {
        name: Some("memory".to_string()),
        capacity: Some(proto::Quantity {
            string: Some("8Gx".to_string()),
        }),
        allocatable: Some(proto::Quantity {
            string: Some("7Gi".to_string()),
        }),
        available: Some(proto::Quantity {
            string: Some("3Gi".to_string()),
        }),
    };
    let err = protobuf::decode::<ResourceInfo>(message.encode_to_vec().as_slice()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::InvalidQuantity {
            field: "capacity",
            ..
        }
    ));

    let err = json::from_str::<ResourceInfo>(
        r#"{"name":"memory","capacity":"lots","allocatable":"1","available":"1"}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn memory_quantities_keep_full_precision() {
    let resource: ResourceInfo = json::from_str(
        r#"{"name":"memory","capacity":"8Gi","allocatable":"7Gi","available":"3Gi"}"#,
    )
    .unwrap();

    assert_eq!(resource.capacity.value(), Some(8 * 1024 * 1024 * 1024));
    assert_eq!(resource.allocatable.value(), Some(7 * 1024 * 1024 * 1024));
    assert_eq!(resource.available.value(), Some(3 * 1024 * 1024 * 1024));

    assert!(resource.available < resource.allocatable);
    assert!(resource.allocatable < resource.capacity);
    assert_ne!(resource.capacity, resource.allocatable);

    let reserved = resource.capacity.checked_sub(&resource.allocatable).unwrap();
    assert_eq!(reserved, q("1Gi"));
    assert_eq!(reserved, q("1073741824"));
    let used = resource.allocatable.checked_sub(&resource.available).unwrap();
    assert_eq!(used.checked_add(&resource.available).unwrap(), resource.allocatable);

    // textual form survives both encodings unchanged
    let bytes = protobuf::encode(&resource);
    let back: ResourceInfo = protobuf::decode(bytes.as_slice()).unwrap();
    assert_eq!(back.capacity.as_str(), "8Gi");
    assert_eq!(back.allocatable.as_str(), "7Gi");
    assert_eq!(back.available.as_str(), "3Gi");
}

#[test]
fn envelope_rejects_wrong_kind() {
    let list = NodeResourceTopologyList::new(vec![node_1()]);
    let bytes = codec::encode(&list, Encoding::Protobuf).unwrap();

    let err = codec::decode::<NodeResourceTopology>(&bytes, Encoding::Protobuf).unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedKind { .. }), "{err}");

    let err = protobuf::decode_envelope::<NodeResourceTopology>(b"\x00\x01\x02").unwrap_err();
    assert!(matches!(err, DecodeError::MissingMagic));
}

#[test]
fn attributes_and_order_survive_both_encodings() {
    let original = node_1()
        .with_attribute("topologyManagerPolicy", "single-numa-node")
        .with_attribute("topologyManagerScope", "pod")
        .with_zone(
            Zone::new("node1", ZoneType::NODE)
                .with_cost("node1", 10)
                .with_cost("node0", 21)
                .with_attribute("cpu.vendor", "x86"),
        );

    for encoding in [Encoding::Json, Encoding::Yaml, Encoding::Protobuf] {
        let bytes = codec::encode(&original, encoding).unwrap();
        let decoded: NodeResourceTopology = codec::decode(&bytes, encoding).unwrap();
        assert_eq!(decoded, original, "{encoding}");
        assert_eq!(
            decoded.attributes,
            vec![
                AttributeInfo::new("topologyManagerPolicy", "single-numa-node"),
                AttributeInfo::new("topologyManagerScope", "pod"),
            ]
        );
        let costs: Vec<_> = decoded.zones[2].costs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(costs, ["node1", "node0"]);
    }
}

#[test]
fn empty_metadata_collections_decode_alike() {
    let mut original = node_1();
    original.metadata.labels = Some(Default::default());
    original.metadata.annotations = Some([("a".to_string(), "b".to_string())].into());
    original.metadata.finalizers = Some(Vec::new());

    let from_json: NodeResourceTopology =
        codec::decode(&codec::encode(&original, Encoding::Json).unwrap(), Encoding::Json).unwrap();
    let from_proto: NodeResourceTopology = codec::decode(
        &codec::encode(&original, Encoding::Protobuf).unwrap(),
        Encoding::Protobuf,
    )
    .unwrap();

    assert_eq!(from_json, from_proto);
    assert!(from_json.metadata.labels.is_none());
    assert!(from_json.metadata.finalizers.is_none());
    assert_eq!(from_json.metadata.annotations, original.metadata.annotations);
}
