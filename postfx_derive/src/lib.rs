use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data::Struct, DeriveInput, Fields};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Implements `Owner` and `Disposable` for a struct.
///
/// Every field marked with `#[owned]` is registered as an owned resource, and
/// disposing the struct disposes exactly those fields, in declaration order.
#[proc_macro_derive(Disposable, attributes(owned))]
pub fn disposable_derive(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	let name = input.ident;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	let out = match input.data {
		Struct(s) => {
			let owned = match s.fields {
				Fields::Named(fields) => fields
					.named
					.into_iter()
					.filter(|f| f.attrs.iter().any(|a| a.path().is_ident("owned")))
					.map(|f| {
						let field_name = f.ident.expect("Named fields need an identifier");
						quote!(&mut self.#field_name as &mut dyn ::postfx::core::disposable::Disposable,)
					})
					.collect::<Vec<_>>(),
				_ => panic!("Disposable can only be derived for structs with named fields"),
			};

			quote! {
				impl #impl_generics ::postfx::core::disposable::Owner for #name #ty_generics #where_clause {
					fn owned_resources(&mut self) -> ::std::vec::Vec<&mut dyn ::postfx::core::disposable::Disposable> {
						::std::vec![#(#owned)*]
					}
				}

				impl #impl_generics ::postfx::core::disposable::Disposable for #name #ty_generics #where_clause {
					fn dispose(&mut self) {
						for resource in ::postfx::core::disposable::Owner::owned_resources(self) {
							resource.dispose();
						}
					}
				}
			}
		}
		_ => panic!("Must be a struct"),
	};

	out.into()
}
