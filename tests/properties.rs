use ea_core::codec::{decode_fea_list, decode_gea_list, encode_fea_list, encode_gea_list};
use ea_core::{Ea, EaList, EaType};
use proptest::prelude::*;

const PREFIXED: [EaType; 6] = [
    EaType::Binary,
    EaType::Ascii,
    EaType::Bitmap,
    EaType::Metafile,
    EaType::Icon,
    EaType::EaRef,
];

fn any_type() -> impl Strategy<Value = EaType> {
    prop_oneof![
        proptest::sample::select(PREFIXED.to_vec()),
        any::<u16>().prop_map(EaType::from_tag),
    ]
}

fn ea_name() -> impl Strategy<Value = String> {
    "[A-Z0-9._]{1,24}"
}

fn entry_offsets(data: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut at = 4;
    loop {
        offsets.push(at);
        let next = u32::from_le_bytes(data[at..at + 4].try_into().unwrap()) as usize;
        if next == 0 {
            return offsets;
        }
        at += next;
    }
}

proptest! {
    #[test]
    fn single_record_roundtrip(
        name in ea_name(),
        value in proptest::collection::vec(any::<u8>(), 1..512),
        ea_type in any_type(),
        flag in any::<u8>(),
    ) {
        let ea = Ea::new(&name, value, ea_type, flag);
        let record = encode_fea_list([&ea]).unwrap();
        let back = decode_fea_list(&record).unwrap();
        prop_assert_eq!(back, vec![ea]);
    }

    #[test]
    fn bulk_and_query_entries_are_aligned(
        members in proptest::collection::btree_map(
            ea_name(),
            proptest::collection::vec(any::<u8>(), 0..40),
            1..12,
        )
    ) {
        let mut list = EaList::new();
        for (name, value) in &members {
            list.insert(Ea::new(name, value.clone(), EaType::Binary, 0)).unwrap();
        }

        let bulk = encode_fea_list(list.iter()).unwrap();
        prop_assert_eq!(bulk.len() % 4, 0);
        prop_assert_eq!(u32::from_le_bytes(bulk[..4].try_into().unwrap()) as usize, bulk.len());
        let offsets = entry_offsets(&bulk);
        prop_assert_eq!(offsets.len(), list.len());
        prop_assert!(offsets.iter().all(|at| at % 4 == 0));

        let query = encode_gea_list(list.iter().map(Ea::name)).unwrap();
        prop_assert!(entry_offsets(&query).iter().all(|at| at % 4 == 0));
        let names: Vec<String> = list.iter().map(|ea| ea.name().to_string()).collect();
        prop_assert_eq!(decode_gea_list(&query).unwrap(), names);
    }

    #[test]
    fn pack_unpack_roundtrip(
        members in proptest::collection::btree_map(
            ea_name(),
            (proptest::sample::select(PREFIXED.to_vec()), proptest::collection::vec(any::<u8>(), 0..64)),
            1..20,
        ),
        flag in any::<u8>(),
        code_page in any::<u16>(),
    ) {
        let mut list = EaList::new();
        for (name, (ea_type, value)) in &members {
            list.insert(Ea::new(name, value.clone(), *ea_type, flag)).unwrap();
        }

        let packed = Ea::from_list_with_code_page("SNAP", &list, flag, code_page).unwrap();
        prop_assert_eq!(packed.num_values().unwrap() as usize, list.len());
        prop_assert_eq!(packed.code_page().unwrap(), code_page);

        let again = Ea::from_list_with_code_page("SNAP", &list, flag, code_page).unwrap();
        prop_assert_eq!(&packed, &again);

        let unpacked = EaList::from_multi("SNAP", &packed).unwrap();
        prop_assert_eq!(unpacked.len(), list.len());
        for (original, restored) in list.iter().zip(unpacked.iter()) {
            prop_assert_eq!(original.value(), restored.value());
            prop_assert_eq!(original.ea_type(), restored.ea_type());
            prop_assert_eq!(original.flag(), restored.flag());
            prop_assert!(restored.name().starts_with("SNAP."));
        }
    }
}
