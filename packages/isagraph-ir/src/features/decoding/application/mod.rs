mod decode_listing;

pub use decode_listing::{
    DecodeListingUseCase, DisassemblyListing, IsaStatistics, LabelMarker, SourceMarker,
};
